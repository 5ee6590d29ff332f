use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::color::ColorScale;
use crate::engine::summary::{Label, Summary};

// ---------------------------------------------------------------------------
// US tile grid
// ---------------------------------------------------------------------------

/// (state code, column, row) of each tile. One equal-size square per state
/// keeps small states readable.
const TILES: [(&str, u8, u8); 51] = [
    ("AK", 0, 0),
    ("ME", 11, 0),
    ("WI", 6, 1),
    ("VT", 10, 1),
    ("NH", 11, 1),
    ("WA", 1, 2),
    ("ID", 2, 2),
    ("MT", 3, 2),
    ("ND", 4, 2),
    ("MN", 5, 2),
    ("IL", 6, 2),
    ("MI", 7, 2),
    ("NY", 9, 2),
    ("MA", 10, 2),
    ("OR", 1, 3),
    ("NV", 2, 3),
    ("WY", 3, 3),
    ("SD", 4, 3),
    ("IA", 5, 3),
    ("IN", 6, 3),
    ("OH", 7, 3),
    ("PA", 8, 3),
    ("NJ", 9, 3),
    ("CT", 10, 3),
    ("RI", 11, 3),
    ("CA", 1, 4),
    ("UT", 2, 4),
    ("CO", 3, 4),
    ("NE", 4, 4),
    ("MO", 5, 4),
    ("KY", 6, 4),
    ("WV", 7, 4),
    ("VA", 8, 4),
    ("MD", 9, 4),
    ("DE", 10, 4),
    ("AZ", 2, 5),
    ("NM", 3, 5),
    ("KS", 4, 5),
    ("AR", 5, 5),
    ("TN", 6, 5),
    ("NC", 7, 5),
    ("SC", 8, 5),
    ("DC", 9, 5),
    ("OK", 4, 6),
    ("LA", 5, 6),
    ("MS", 6, 6),
    ("AL", 7, 6),
    ("GA", 8, 6),
    ("HI", 0, 7),
    ("TX", 4, 7),
    ("FL", 9, 7),
];

const COLUMNS: f32 = 12.0;
const ROWS: f32 = 8.0;

fn tile_position(code: &str) -> Option<(u8, u8)> {
    TILES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(_, col, row)| (col, row))
}

// ---------------------------------------------------------------------------
// Choropleth
// ---------------------------------------------------------------------------

/// Paint one tile per state filled by its value, plus a colour bar.
/// States without data are drawn as empty outlines.
pub fn state_map(ui: &mut Ui, summary: &Summary<f64>, height: f32) {
    let Some(scale) = ColorScale::reds(summary.entries.iter().map(|e| e.value)) else {
        ui.label("No rates to map.");
        return;
    };

    let legend_height = 28.0;
    let map_height = (height - legend_height).max(ROWS * 8.0);
    let tile = (ui.available_width() / COLUMNS).min(map_height / ROWS);
    let (response, painter) =
        ui.allocate_painter(Vec2::new(tile * COLUMNS, tile * ROWS), Sense::hover());
    let origin = response.rect.min;
    let hover = response.hover_pos();
    let mut hovered = None;

    for &(code, col, row) in &TILES {
        let min = origin + Vec2::new(f32::from(col) * tile, f32::from(row) * tile);
        let rect = Rect::from_min_size(min, Vec2::splat(tile)).shrink(1.0);
        let value = summary.get(&Label::Text(code.to_string())).copied();

        match value {
            Some(v) => painter.rect_filled(rect, 2.0, scale.color_for(v)),
            None => painter.rect_stroke(
                rect,
                2.0,
                Stroke::new(1.0, Color32::GRAY),
                egui::StrokeKind::Inside,
            ),
        };

        let dark = value.is_some_and(|v| scale.fraction(v) > 0.55);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            code,
            FontId::proportional((tile * 0.32).max(7.0)),
            if dark { Color32::WHITE } else { Color32::DARK_GRAY },
        );

        if hover.is_some_and(|p| rect.contains(p)) {
            hovered = Some((code, value));
        }
    }

    let unmapped: Vec<String> = summary
        .labels()
        .map(|l| l.to_string())
        .filter(|code| tile_position(code).is_none())
        .collect();

    if let Some((code, value)) = hovered {
        let text = match value {
            Some(v) if v.is_finite() => format!("{code}: ${v:.2}"),
            Some(_) => format!("{code}: n/a"),
            None => format!("{code}: no data"),
        };
        response.on_hover_text(text);
    }

    color_bar(ui, &scale, tile * COLUMNS, legend_height);
    if !unmapped.is_empty() {
        ui.small(format!("Not on map: {}", unmapped.join(", ")));
    }
}

/// Horizontal gradient strip labelled with the scale's min and max.
fn color_bar(ui: &mut Ui, scale: &ColorScale, width: f32, height: f32) {
    const STEPS: usize = 32;
    let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::hover());
    let strip = Rect::from_min_size(response.rect.min, Vec2::new(width * 0.6, height * 0.45));
    let (min, max) = scale.range();

    let step_w = strip.width() / STEPS as f32;
    for i in 0..STEPS {
        let t = i as f64 / (STEPS - 1) as f64;
        let x0 = strip.min.x + step_w * i as f32;
        let rect = Rect::from_min_max(
            Pos2::new(x0, strip.min.y),
            Pos2::new(x0 + step_w, strip.max.y),
        );
        painter.rect_filled(rect, 0.0, scale.color_for(min + (max - min) * t));
    }

    let font = FontId::proportional(10.0);
    let color = ui.visuals().text_color();
    painter.text(
        strip.left_bottom(),
        Align2::LEFT_TOP,
        format!("${min:.0}"),
        font.clone(),
        color,
    );
    painter.text(
        strip.right_bottom(),
        Align2::RIGHT_TOP,
        format!("${max:.0}"),
        font.clone(),
        color,
    );
    painter.text(
        Pos2::new(strip.max.x + 8.0, strip.center().y),
        Align2::LEFT_CENTER,
        "Rate ($)",
        font,
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tiles_are_unique() {
        let codes: HashSet<_> = TILES.iter().map(|t| t.0).collect();
        let cells: HashSet<_> = TILES.iter().map(|t| (t.1, t.2)).collect();
        assert_eq!(codes.len(), TILES.len());
        assert_eq!(cells.len(), TILES.len());
        assert!(TILES
            .iter()
            .all(|&(_, c, r)| f32::from(c) < COLUMNS && f32::from(r) < ROWS));
    }

    #[test]
    fn test_tile_lookup() {
        assert_eq!(tile_position("TX"), Some((4, 7)));
        assert_eq!(tile_position("PR"), None);
    }
}
