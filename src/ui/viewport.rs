use super::port::Bounds;

/// Whether any part of `bounds` is on screen, ignoring the bottom
/// `nav_offset` rows of the viewport.
pub fn is_visible(bounds: Bounds, viewport_height: f64, nav_offset: f64) -> bool {
    bounds.bottom() > 0.0 && bounds.top < viewport_height - nav_offset
}
