pub mod assets;
pub mod camera;
pub mod core;
pub mod loading;
pub mod mesh;
pub mod pipeline;
pub mod scene;
pub mod shaders;
pub mod systems;
