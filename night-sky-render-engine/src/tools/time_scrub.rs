//! Keyboard control of the observation slider (native builds).
//!
//! `[` / `]` step the minute, ten at a time or an hour with Shift held.
//! `,` / `.` step the date by a day.

use crate::engine::pipeline::sky_context::ObservationTimeline;
use crate::sky::time::SkyTimeline;
use bevy::prelude::*;
use constants::render_settings::{TIME_SCRUB_FAST_MULTIPLIER, TIME_SCRUB_STEP_MINUTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubStep {
    Minutes(i64),
    Days(i64),
}

pub fn apply_scrub(timeline: &mut SkyTimeline, step: ScrubStep) {
    match step {
        ScrubStep::Minutes(delta) => timeline.shift_minutes(delta),
        ScrubStep::Days(delta) => {
            if !timeline.advance_days(delta) {
                warn!("Observation date cannot move by {delta} days");
            }
        }
    }
}

pub fn scrub_step_for(keyboard: &ButtonInput<KeyCode>) -> Option<ScrubStep> {
    let fast = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let minutes = if fast {
        TIME_SCRUB_STEP_MINUTES * TIME_SCRUB_FAST_MULTIPLIER
    } else {
        TIME_SCRUB_STEP_MINUTES
    } as i64;

    if keyboard.just_pressed(KeyCode::BracketRight) {
        Some(ScrubStep::Minutes(minutes))
    } else if keyboard.just_pressed(KeyCode::BracketLeft) {
        Some(ScrubStep::Minutes(-minutes))
    } else if keyboard.just_pressed(KeyCode::Period) {
        Some(ScrubStep::Days(1))
    } else if keyboard.just_pressed(KeyCode::Comma) {
        Some(ScrubStep::Days(-1))
    } else {
        None
    }
}

pub fn time_scrub_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut timeline: ResMut<ObservationTimeline>,
) {
    let Some(step) = scrub_step_for(&keyboard) else {
        return;
    };
    apply_scrub(&mut timeline.0, step);
    debug!(
        "Observation time {} minute {}",
        timeline.0.weekday_label(),
        timeline.0.minute_of_day()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn timeline(minute: i64) -> SkyTimeline {
        SkyTimeline::new(
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            FixedOffset::east_opt(0).unwrap(),
            minute,
        )
    }

    #[test]
    fn brackets_step_minutes() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::BracketRight);
        assert_eq!(scrub_step_for(&keyboard), Some(ScrubStep::Minutes(10)));

        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::ShiftLeft);
        keyboard.press(KeyCode::BracketLeft);
        assert_eq!(scrub_step_for(&keyboard), Some(ScrubStep::Minutes(-60)));
    }

    #[test]
    fn no_step_without_a_key() {
        let keyboard = ButtonInput::<KeyCode>::default();
        assert_eq!(scrub_step_for(&keyboard), None);
    }

    #[test]
    fn minute_steps_stop_at_end_of_day() {
        let mut timeline = timeline(1435);
        apply_scrub(&mut timeline, ScrubStep::Minutes(10));
        assert_eq!(timeline.minute_of_day(), 1439);
        assert_eq!(timeline.date(), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn day_steps_keep_the_minute() {
        let mut timeline = timeline(600);
        apply_scrub(&mut timeline, ScrubStep::Days(-1));
        assert_eq!(timeline.minute_of_day(), 600);
        assert_eq!(timeline.date(), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    }
}
