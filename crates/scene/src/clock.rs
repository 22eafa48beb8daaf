//! Shared animation clock.
//!
//! One monotonic elapsed-seconds counter drives marker bob, layer sway, and
//! particle rotation so every animated component shares the same phase source.

use bevy::prelude::*;

/// Monotonic scene time in seconds. Never decreases within a session.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct AnimationClock {
    pub elapsed: f32,
}

impl AnimationClock {
    pub fn elapsed_f64(&self) -> f64 {
        self.elapsed as f64
    }
}

pub fn advance_clock(time: Res<Time>, mut clock: ResMut<AnimationClock>) {
    clock.elapsed += time.delta_secs();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_advances_monotonically() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<AnimationClock>();
        app.add_systems(Update, advance_clock);

        let mut last = 0.0;
        for _ in 0..20 {
            std::thread::sleep(std::time::Duration::from_millis(1));
            app.update();
            let now = app.world().resource::<AnimationClock>().elapsed;
            assert!(now >= last, "clock ran backwards: {now} < {last}");
            last = now;
        }
        assert!(last > 0.0);
    }
}
