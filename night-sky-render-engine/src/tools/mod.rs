//! Interactive tools layered over the rendered sky.
//!
//! - [`star_picking`]: click a star to request focus on it.
//! - [`focus`]: eases the camera onto a selected star and keeps it there
//!   across rebuilds until cleared or the star sets.
//! - [`time_scrub`]: native keyboard stepping of the observation slider.
//!
//! Selection requests from clicks and from RPC both travel as
//! [`focus::FocusCommand`] events so they apply in arrival order.

pub mod focus;
pub mod star_picking;
pub mod time_scrub;
