use eframe::egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, Vec2, vec2};

use crate::graph::Role;
use crate::layout::Viewport;

pub(super) const ROOT_RADIUS: f32 = 18.0;
pub(super) const NODE_RADIUS: f32 = 14.0;

pub(super) const OUTGOING_LINK_COLOR: Color32 = Color32::from_rgb(229, 57, 53);
pub(super) const INCOMING_LINK_COLOR: Color32 = Color32::from_rgb(0, 128, 0);

pub(super) fn role_color(role: Role) -> Color32 {
    match role {
        Role::Root => Color32::from_rgb(52, 152, 219),
        Role::Ancestor => Color32::from_rgb(46, 204, 113),
        Role::Descendant => Color32::from_rgb(231, 76, 60),
    }
}

pub(super) fn node_radius(role: Role) -> f32 {
    if role == Role::Root {
        ROOT_RADIUS
    } else {
        NODE_RADIUS
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;

    let mut x = origin.x.rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        x += step;
    }

    let mut y = origin.y.rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70)),
        );
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Layout coordinates are relative to the viewport's top-left corner; zoom
/// scales around the viewport centre.
pub(super) fn world_to_screen(
    rect: Rect,
    viewport: Viewport,
    pan: Vec2,
    zoom: f32,
    world: Vec2,
) -> Pos2 {
    let (center_x, center_y) = viewport.center();
    rect.center() + pan + (world - vec2(center_x, center_y)) * zoom
}

pub(super) fn screen_to_world(
    rect: Rect,
    viewport: Viewport,
    pan: Vec2,
    zoom: f32,
    screen: Pos2,
) -> Vec2 {
    let (center_x, center_y) = viewport.center();
    (screen - rect.center() - pan) / zoom + vec2(center_x, center_y)
}

pub(super) fn trimmed_segment(
    start: Pos2,
    end: Pos2,
    start_radius: f32,
    end_radius: f32,
) -> Option<(Pos2, Pos2)> {
    let delta = end - start;
    let length = delta.length();
    if length <= start_radius + end_radius {
        return None;
    }

    let direction = delta / length;
    Some((start + direction * start_radius, end - direction * end_radius))
}

pub(super) fn arrow_head(tip: Pos2, from: Pos2, size: f32, color: Color32) -> Shape {
    let direction = (tip - from).normalized();
    let normal = vec2(-direction.y, direction.x);
    let base = tip - direction * size;

    Shape::convex_polygon(
        vec![tip, base + normal * (size * 0.5), base - normal * (size * 0.5)],
        color,
        Stroke::NONE,
    )
}
