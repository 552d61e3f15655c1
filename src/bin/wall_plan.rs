use hang_guide::config::wall::{load_config, WallPlanConfig};
use hang_guide::geometry::Point2D;
use hang_guide::image::io::{load_frame, save_frame, write_json_file};
use hang_guide::render::{draw_border_lines, draw_grid, draw_slices};
use hang_guide::session::{WallAnalyzer, WallPlan};
use std::env;
use std::path::Path;

fn usage() -> String {
    "Usage: wall_plan <config.json>".to_string()
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let frame = load_frame(&config.input)?;
    let manual: Option<Vec<Point2D>> = config
        .corners
        .as_ref()
        .map(|pts| pts.iter().map(|&[x, y]| Point2D::new(x, y)).collect());

    let analyzer = WallAnalyzer::new(config.params.clone());
    let plan = analyzer
        .analyze(&frame, manual.as_deref())
        .map_err(|e| format!("Wall analysis failed: {e}"))?;

    print_summary(&plan);

    let (grid, target) = match &config.selection {
        Some(sel) => {
            let grid = plan
                .grid_for_slice(sel.slice)
                .map_err(|e| format!("Grid selection failed: {e}"))?;
            let target = match sel.click {
                Some([x, y]) => Some(
                    grid.resolve_selection(Point2D::new(x, y))
                        .map_err(|e| format!("Grid selection failed: {e}"))?,
                ),
                None => None,
            };
            if let Some(t) = target {
                println!("Target hang point: ({:.1}, {:.1})", t.x, t.y);
            }
            (Some(grid), target)
        }
        None => (None, None),
    };

    write_outputs(&config, &frame, &plan, grid.as_ref(), target)?;

    if let Some(path) = &config.output.plan_json {
        write_json_file(path, &plan.to_hang_plan(grid, target))?;
        println!("Plan written to {}", path.display());
    }
    Ok(())
}

fn print_summary(plan: &WallPlan) {
    let q = &plan.corners.quad;
    println!("Wall plan");
    println!(
        "  corners ({:?}): tl=({:.1}, {:.1}) tr=({:.1}, {:.1}) br=({:.1}, {:.1}) bl=({:.1}, {:.1})",
        plan.corners.source, q.tl.x, q.tl.y, q.tr.x, q.tr.y, q.br.x, q.br.y, q.bl.x, q.bl.y
    );
    if let Some(reason) = plan.corners.fallback {
        println!("  fallback: {reason:?}");
    }
    println!(
        "  rectified: {}x{}",
        plan.rectification.width, plan.rectification.height
    );
    for s in &plan.slices {
        println!("  slice {}: x=[{:.0}, {:.0})", s.number, s.x0, s.x1);
    }
    let t = &plan.report.timings;
    let stages: Vec<String> = t
        .stages
        .iter()
        .map(|s| format!("{}={:.2}", s.label, s.elapsed_ms))
        .collect();
    println!("  timings (ms): {} total={:.2}", stages.join(" "), t.total_ms);
}

fn write_outputs(
    config: &WallPlanConfig,
    frame: &hang_guide::image::Frame,
    plan: &WallPlan,
    grid: Option<&hang_guide::grid::Grid>,
    target: Option<Point2D>,
) -> Result<(), String> {
    let out = &config.output;
    if let Some(path) = &out.rectified_image {
        save_frame(&plan.rectified, path)?;
    }
    if let (Some(path), Some(lines)) = (&out.borders_image, &plan.border_lines) {
        save_frame(&draw_border_lines(frame, lines, &plan.corners.quad), path)?;
    }
    if let Some(path) = &out.slices_image {
        save_frame(&draw_slices(&plan.rectified, &plan.slices), path)?;
    }
    if let (Some(path), Some(grid)) = (&out.grid_image, grid) {
        save_frame(&draw_grid(&plan.rectified, grid, target), path)?;
    }
    Ok(())
}
