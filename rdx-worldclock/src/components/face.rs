//! Text rendering of an analog clock face.
//!
//! Terminal cells are roughly twice as tall as they are wide, so horizontal
//! distances are doubled to keep the dial round.

use crate::time::DisplayTime;

const MIN_RADIUS: usize = 3;

const HOUR_HAND: char = 'h';
const MINUTE_HAND: char = 'm';
const SECOND_HAND: char = 's';
const QUARTER_MARK: char = '+';
const HOUR_MARK: char = '.';
const CENTER: char = 'o';

/// Renders a dial of `radius` rows above and below the centre.
///
/// Hands are drawn second, minute, hour, so the shorter hands stay visible
/// where they overlap.
pub fn render_face(display: &DisplayTime, radius: usize) -> Vec<String> {
    let radius = radius.max(MIN_RADIUS);
    let mut canvas = Canvas::new(radius);

    for mark in 0..12 {
        let glyph = if mark % 3 == 0 { QUARTER_MARK } else { HOUR_MARK };
        canvas.plot_polar(f64::from(mark) * 30.0, radius as f64, glyph);
    }

    canvas.draw_hand(display.second_angle_deg, 0.8, SECOND_HAND);
    canvas.draw_hand(display.minute_angle_deg, 0.7, MINUTE_HAND);
    canvas.draw_hand(display.hour_angle_deg, 0.45, HOUR_HAND);
    canvas.plot_polar(0.0, 0.0, CENTER);

    canvas.into_lines()
}

struct Canvas {
    radius: usize,
    cells: Vec<Vec<char>>,
}

impl Canvas {
    fn new(radius: usize) -> Self {
        let height = 2 * radius + 1;
        let width = 4 * radius + 1;
        Self {
            radius,
            cells: vec![vec![' '; width]; height],
        }
    }

    fn draw_hand(&mut self, angle_deg: f64, length: f64, glyph: char) {
        let reach = self.radius as f64 * length;
        let steps = (reach * 2.0).ceil() as usize;
        for step in 1..=steps {
            let distance = reach * step as f64 / steps as f64;
            self.plot_polar(angle_deg, distance, glyph);
        }
    }

    /// Plots at `distance` rows from the centre, clockwise from 12.
    fn plot_polar(&mut self, angle_deg: f64, distance: f64, glyph: char) {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let row = self.radius as f64 - (distance * cos).round();
        let col = (2 * self.radius) as f64 + (distance * sin * 2.0).round();
        if row < 0.0 || col < 0.0 {
            return;
        }
        if let Some(cell) = self
            .cells
            .get_mut(row as usize)
            .and_then(|line| line.get_mut(col as usize))
        {
            *cell = glyph;
        }
    }

    fn into_lines(self) -> Vec<String> {
        self.cells
            .into_iter()
            .map(|line| line.into_iter().collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(lines: &[String], row: usize, col: usize) -> char {
        lines[row].chars().nth(col).unwrap()
    }

    #[test]
    fn hands_point_along_their_angles() {
        let display = DisplayTime {
            hour_angle_deg: 0.0,
            minute_angle_deg: 90.0,
            second_angle_deg: 180.0,
        };
        let lines = render_face(&display, 4);
        let (center_row, center_col) = (4, 8);

        assert_eq!(cell(&lines, center_row, center_col), CENTER);
        assert_eq!(cell(&lines, center_row - 1, center_col), HOUR_HAND);
        assert_eq!(cell(&lines, center_row, center_col + 1), MINUTE_HAND);
        assert_eq!(cell(&lines, center_row + 1, center_col), SECOND_HAND);
    }

    #[test]
    fn dial_has_quarter_marks_and_fixed_size() {
        let display = DisplayTime {
            hour_angle_deg: 45.0,
            minute_angle_deg: 45.0,
            second_angle_deg: 45.0,
        };
        let lines = render_face(&display, 4);

        assert_eq!(lines.len(), 9);
        assert!(lines.iter().all(|line| line.chars().count() == 17));
        assert_eq!(cell(&lines, 0, 8), QUARTER_MARK);
        assert_eq!(cell(&lines, 8, 8), QUARTER_MARK);
        assert_eq!(cell(&lines, 4, 0), QUARTER_MARK);
        assert_eq!(cell(&lines, 4, 16), QUARTER_MARK);
    }

    #[test]
    fn tiny_radius_is_clamped() {
        let display = DisplayTime {
            hour_angle_deg: 0.0,
            minute_angle_deg: 0.0,
            second_angle_deg: 0.0,
        };
        assert_eq!(render_face(&display, 0).len(), 2 * MIN_RADIUS + 1);
    }
}
