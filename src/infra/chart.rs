// ============================================================
// Layer 6: Accuracy Chart
// ============================================================
// Renders test accuracy per epoch as a standalone SVG line
// chart: x = epoch (1..n), y = accuracy on a fixed [0, 1]
// axis so charts from different runs compare directly.

use anyhow::{Context, Result};
use std::{fmt::Write as _, fs, path::Path};

const WIDTH:  f64 = 760.0;
const HEIGHT: f64 = 260.0;
const PAD_L:  f64 = 56.0;
const PAD_R:  f64 = 16.0;
const PAD_T:  f64 = 24.0;
const PAD_B:  f64 = 40.0;

const GRID:  &str = "#f0f2f5";
const MUTED: &str = "#999";
const LINE:  &str = "#1e40af";

/// Build the SVG document for a sequence of per-epoch accuracies.
///
/// Zero epochs yields axes only; one epoch yields a single marker.
pub fn render_accuracy_svg(accuracy: &[f64]) -> String {
    let n = accuracy.len();
    let plot_w = WIDTH - PAD_L - PAD_R;
    let plot_h = HEIGHT - PAD_T - PAD_B;

    let px = |i: usize, v: f64| -> (f64, f64) {
        let x = if n > 1 {
            PAD_L + (i as f64 / (n - 1) as f64) * plot_w
        } else {
            PAD_L + plot_w / 2.0
        };
        let y = PAD_T + (1.0 - v.clamp(0.0, 1.0)) * plot_h;
        (x, y)
    };

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">"
    );
    let _ = writeln!(svg, "<rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"white\"/>");

    // Horizontal grid with accuracy labels at 0, 0.25 .. 1
    for g in 0..=4 {
        let frac = g as f64 / 4.0;
        let y    = PAD_T + (1.0 - frac) * plot_h;
        let _ = writeln!(
            svg,
            "<line x1=\"{PAD_L:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{GRID}\" stroke-width=\"1\"/>",
            WIDTH - PAD_R,
        );
        let _ = writeln!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{MUTED}\" font-size=\"10\">{frac:.2}</text>",
            PAD_L - 6.0,
            y + 4.0,
        );
    }

    // Epoch ticks: first, middle, last
    if n > 0 {
        let mut ticks = vec![0, n / 2, n - 1];
        ticks.dedup();
        for i in ticks {
            let (x, _) = px(i, 0.0);
            let _ = writeln!(
                svg,
                "<text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{MUTED}\" font-size=\"10\">{}</text>",
                HEIGHT - PAD_B + 16.0,
                i + 1,
            );
        }
    }

    let _ = writeln!(
        svg,
        "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"#333\" font-size=\"11\">Epoch</text>",
        PAD_L + plot_w / 2.0,
        HEIGHT - 6.0,
    );
    let _ = writeln!(
        svg,
        "<text x=\"14\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"#333\" font-size=\"11\" \
         transform=\"rotate(-90 14 {:.1})\">Accuracy</text>",
        PAD_T + plot_h / 2.0,
        PAD_T + plot_h / 2.0,
    );

    match n {
        0 => {}
        1 => {
            let (x, y) = px(0, accuracy[0]);
            let _ = writeln!(svg, "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3\" fill=\"{LINE}\"/>");
        }
        _ => {
            let path: String = accuracy
                .iter()
                .enumerate()
                .map(|(i, &v)| {
                    let (x, y) = px(i, v);
                    if i == 0 { format!("M{x:.1},{y:.1}") } else { format!(" L{x:.1},{y:.1}") }
                })
                .collect();
            let _ = writeln!(
                svg,
                "<path d=\"{path}\" fill=\"none\" stroke=\"{LINE}\" stroke-width=\"2\"/>"
            );
        }
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn write_accuracy_chart(path: &Path, accuracy: &[f64]) -> Result<()> {
    fs::write(path, render_accuracy_svg(accuracy))
        .with_context(|| format!("Cannot write chart to '{}'", path.display()))?;
    tracing::info!("Accuracy chart written to '{}'", path.display());
    Ok(())
}
