//! Render Module: one frame onto the Backend surface.
//!
//! Responsibilities:
//! - Fill each focus element with the color for its current FocusState
//! - Navigation overlay: half-length line toward each neighbor, colored by direction
//! - Run registered drawables in registration order
//! - Present

use crate::context::Engine;
use crate::error::BackendError;
use crate::navigation::Direction;
use crate::types::Point;

/// Render pipeline:
/// 1. Clear
/// 2. Focus elements
/// 3. Navigation overlay (when `config.debug_navigation`)
/// 4. Drawables
/// 5. Present
pub(crate) fn render_frame(engine: &mut Engine) -> Result<(), BackendError> {
    let start = std::time::Instant::now();

    engine.backend.clear()?;

    let surface = engine.backend.surface();
    for element in engine.elements.values() {
        surface.fill_rect(element.rect, element.colors.color_for(element.state))?;
    }

    if engine.config.debug_navigation {
        for element in engine.elements.values() {
            let center = element.rect.center();
            for dir in Direction::ALL {
                let Some(target) = element
                    .neighbor(dir)
                    .and_then(|handle| engine.elements.get(&handle))
                else {
                    continue;
                };
                let delta = target.rect.center() - center;
                let end = center + Point::new(delta.x / 2, delta.y / 2);
                surface.draw_line(center, end, dir.color())?;
            }
        }
    }

    for drawable in engine.drawables.clone() {
        match drawable.try_borrow_mut() {
            Ok(mut d) => d.draw(engine.backend.surface())?,
            Err(_) => tracing::warn!("skipping reentrant drawable"),
        }
    }

    engine.backend.present()?;

    tracing::trace!(
        elements = engine.elements.len(),
        elapsed_us = start.elapsed().as_micros() as u64,
        "frame rendered"
    );
    Ok(())
}
