//! Scripted host lifecycle
//!
//! Plays the role of a well-behaved mobile host: start, show, focus, render
//! some frames with a tap in between, then lose focus, save and hide.

use vessel_core::Runtime;
use vessel_platform::{LifecycleRequest, RawTouch, SurfaceSize, TouchPhase};

/// One step the simulated host performs
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    Lifecycle(LifecycleRequest),
    Touch(RawTouch),
}

/// The host script for a run of `frames` frames on `surface`
pub fn script(frames: u32, surface: SurfaceSize) -> Vec<Step> {
    let center_x = surface.width as f32 / 2.0;
    let center_y = surface.height as f32 / 2.0;

    let mut steps = vec![
        Step::Lifecycle(LifecycleRequest::Initialize),
        Step::Lifecycle(LifecycleRequest::BecomeVisible {
            new_context: true,
            surface,
        }),
        Step::Lifecycle(LifecycleRequest::BecomeActive),
    ];
    for frame in 0..frames {
        if frame == frames / 2 {
            steps.push(Step::Touch(RawTouch::new(
                TouchPhase::Down,
                center_x,
                center_y,
            )));
            steps.push(Step::Touch(RawTouch::new(TouchPhase::Up, center_x, center_y)));
        }
        steps.push(Step::Lifecycle(LifecycleRequest::Render));
    }
    steps.extend([
        Step::Lifecycle(LifecycleRequest::BecomeInactive),
        Step::Lifecycle(LifecycleRequest::SaveState),
        Step::Lifecycle(LifecycleRequest::BecomeHidden),
    ]);
    steps
}

/// Reorder the script for hosts that save after hiding
pub fn save_after_hidden(mut steps: Vec<Step>) -> Vec<Step> {
    let save = Step::Lifecycle(LifecycleRequest::SaveState);
    if let Some(at) = steps.iter().position(|s| *s == save) {
        steps.remove(at);
        steps.push(save);
    }
    steps
}

/// Apply every step to the runtime in order
pub fn run(runtime: &Runtime, steps: &[Step]) {
    for step in steps {
        match *step {
            Step::Lifecycle(request) => {
                tracing::debug!("host: {}", request.name());
                runtime.apply(request);
            }
            Step::Touch(touch) => {
                tracing::debug!("host: touch {:?} at ({}, {})", touch.phase, touch.x, touch.y);
                runtime.inject_touch(touch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleRequest::*;

    #[test]
    fn test_script_shape() {
        let steps = script(2, SurfaceSize::new(100, 200));
        let lifecycle: Vec<_> = steps
            .iter()
            .filter_map(|s| match s {
                Step::Lifecycle(r) => Some(r.name()),
                Step::Touch(_) => None,
            })
            .collect();
        assert_eq!(
            lifecycle,
            vec![
                "initialize",
                "become_visible",
                "become_active",
                "render",
                "render",
                "become_inactive",
                "save_state",
                "become_hidden"
            ]
        );
        assert_eq!(
            steps.iter().filter(|s| matches!(s, Step::Touch(_))).count(),
            2
        );
    }

    #[test]
    fn test_zero_frames_has_no_touch() {
        let steps = script(0, SurfaceSize::new(10, 10));
        assert!(steps.iter().all(|s| matches!(s, Step::Lifecycle(_))));
        assert_eq!(steps.len(), 6);
    }

    #[test]
    fn test_save_after_hidden_moves_save_last() {
        let steps = save_after_hidden(script(0, SurfaceSize::new(10, 10)));
        assert_eq!(steps[4], Step::Lifecycle(BecomeHidden));
        assert_eq!(steps[5], Step::Lifecycle(SaveState));
    }
}
