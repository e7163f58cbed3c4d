//! Five-axis radar chart geometry.
//!
//! Computes the SVG coordinates the result template draws: concentric grid
//! rings, spokes, axis labels, and the score polygon. Axis 0 points straight
//! up and the rest follow clockwise.

use commai_core::assessment::{Axis, Scores};
use serde::Serialize;
use std::f64::consts::PI;

pub const VIEWBOX: f64 = 320.0;
const CENTER: f64 = VIEWBOX / 2.0;
const RADIUS: f64 = 110.0;
const LABEL_OFFSET: f64 = 24.0;
const MAX_SCORE: f64 = 100.0;
const RING_STEPS: [f64; 5] = [20.0, 40.0, 60.0, 80.0, 100.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub text: &'static str,
    pub score: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub viewbox: f64,
    pub center: Point,
    /// One SVG `points` string per grid ring, innermost first.
    pub rings: Vec<String>,
    /// Outer end of each spoke.
    pub spokes: Vec<Point>,
    pub labels: Vec<AxisLabel>,
    /// SVG `points` string of the score polygon.
    pub polygon: String,
    pub vertices: Vec<Point>,
}

fn angle(index: usize) -> f64 {
    -PI / 2.0 + index as f64 * 2.0 * PI / Axis::ALL.len() as f64
}

fn polar(index: usize, distance: f64) -> Point {
    let theta = angle(index);
    Point {
        x: CENTER + distance * theta.cos(),
        y: CENTER + distance * theta.sin(),
    }
}

/// Maps a score onto the chart radius. Out-of-range values are clamped for
/// drawing only; the label still shows the raw score.
fn scaled(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(0.0, MAX_SCORE) / MAX_SCORE * RADIUS
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.1},{:.1}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

impl RadarChart {
    pub fn from_scores(scores: &Scores) -> Self {
        let rings = RING_STEPS
            .iter()
            .map(|step| {
                let ring: Vec<Point> = (0..Axis::ALL.len())
                    .map(|i| polar(i, step / MAX_SCORE * RADIUS))
                    .collect();
                points_attr(&ring)
            })
            .collect();

        let spokes = (0..Axis::ALL.len()).map(|i| polar(i, RADIUS)).collect();

        let by_axis = scores.by_axis();
        let labels = by_axis
            .iter()
            .enumerate()
            .map(|(i, (axis, score))| {
                let at = polar(i, RADIUS + LABEL_OFFSET);
                AxisLabel {
                    text: axis.label(),
                    score: score.to_string(),
                    x: at.x,
                    y: at.y,
                }
            })
            .collect();

        let vertices: Vec<Point> = by_axis
            .iter()
            .enumerate()
            .map(|(i, (_, score))| polar(i, scaled(*score)))
            .collect();

        Self {
            viewbox: VIEWBOX,
            center: Point {
                x: CENTER,
                y: CENTER,
            },
            rings,
            spokes,
            labels,
            polygon: points_attr(&vertices),
            vertices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn uniform(value: f64) -> Scores {
        Scores {
            empathy: value,
            logic: value,
            clarity: value,
            confidence: value,
            persuasion: value,
        }
    }

    #[test]
    fn test_full_score_touches_outer_ring() {
        let chart = RadarChart::from_scores(&uniform(100.0));
        for (vertex, spoke) in chart.vertices.iter().zip(&chart.spokes) {
            assert_relative_eq!(vertex.x, spoke.x, epsilon = 1e-9);
            assert_relative_eq!(vertex.y, spoke.y, epsilon = 1e-9);
        }
        assert_eq!(chart.polygon, *chart.rings.last().unwrap());
    }

    #[test]
    fn test_first_axis_points_up() {
        let chart = RadarChart::from_scores(&uniform(50.0));
        let top = chart.vertices[0];
        assert_relative_eq!(top.x, CENTER, epsilon = 1e-9);
        assert_relative_eq!(top.y, CENTER - RADIUS / 2.0, epsilon = 1e-9);
        // Second axis is clockwise, to the right of centre.
        assert!(chart.vertices[1].x > CENTER);
    }

    #[test]
    fn test_zero_score_collapses_to_center() {
        let chart = RadarChart::from_scores(&uniform(0.0));
        for vertex in &chart.vertices {
            assert_relative_eq!(vertex.x, CENTER, epsilon = 1e-9);
            assert_relative_eq!(vertex.y, CENTER, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_out_of_range_scores_are_clamped_for_drawing() {
        let mut scores = uniform(60.0);
        scores.logic = 140.0;
        scores.clarity = -20.0;
        let chart = RadarChart::from_scores(&scores);

        let logic = chart.vertices[1];
        let distance = ((logic.x - CENTER).powi(2) + (logic.y - CENTER).powi(2)).sqrt();
        assert_relative_eq!(distance, RADIUS, epsilon = 1e-9);
        assert_relative_eq!(chart.vertices[2].x, CENTER, epsilon = 1e-9);
        assert_eq!(chart.labels[1].score, "140");
        assert_eq!(chart.labels[2].score, "-20");
    }

    #[test]
    fn test_labels_follow_axis_order() {
        let chart = RadarChart::from_scores(&uniform(70.0));
        let texts: Vec<&str> = chart.labels.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["共感力", "論理性", "明瞭さ", "自信", "説得力"]);
        assert_eq!(chart.rings.len(), 5);
        assert_eq!(chart.polygon.split(' ').count(), 5);
    }

    #[test]
    fn test_labels_keep_fractional_scores() {
        let mut scores = uniform(72.4);
        scores.logic = 65.5;
        let chart = RadarChart::from_scores(&scores);
        assert_eq!(chart.labels[0].score, "72.4");
        assert_eq!(chart.labels[1].score, "65.5");
    }
}
