// Render command builder: ImageMagick `convert` argument lists
use super::axis_layout::{AxisLayout, AxisSpec, layout_axis_overlay};
use super::dpi::{DpiMultiplier, ImageDimensions, OVERLAY_REFERENCE_WIDTH};
use super::draw::{DrawCommand, Gravity};
use super::error::AnnotateResult;
use super::legend::{LabelEdge, LegendLabel, LegendRecipe, SwatchCatalog, compose_legend};
use super::params::{AnnotationParams, LegendParams, ResizeParams};
use std::path::{Path, PathBuf};

/// One complete renderer invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInstructions {
    pub args: Vec<String>,
    pub output: PathBuf,
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// ImageMagick expands `%` escapes in text and reads `@file` as a file name.
pub fn escape_text(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('%', "%%");
    match escaped.strip_prefix('@') {
        Some(rest) => format!("\\@{}", rest),
        None => escaped,
    }
}

pub fn build_axis_overlay_instructions(
    dimensions: ImageDimensions,
    params: &AnnotationParams,
    input: &Path,
    output: &Path,
) -> AnnotateResult<RenderInstructions> {
    let dpi = DpiMultiplier::new(dimensions, OVERLAY_REFERENCE_WIDTH)?;
    tracing::debug!("overlay dpi multiplier {}", dpi.value());

    let layout = layout_axis_overlay(&AxisSpec::REFERENCE, params)?;
    Ok(serialize_axis_layout(&layout, dpi, input, output))
}

pub fn serialize_axis_layout(
    layout: &AxisLayout,
    dpi: DpiMultiplier,
    input: &Path,
    output: &Path,
) -> RenderInstructions {
    let mut args = vec![path_arg(input), "-transparent".into(), "white".into()];
    args.extend(["-stroke", "black"].map(String::from));

    let mut stroke_width = layout.stroke_width;
    args.extend(["-strokewidth".into(), dpi.scale(stroke_width).to_string()]);

    for command in &layout.commands {
        if let DrawCommand::Line { line, stroke_width: width } = command {
            if *width != stroke_width {
                stroke_width = *width;
                args.extend(["-strokewidth".into(), dpi.scale(stroke_width).to_string()]);
            }
            let (x1, y1) = dpi.scale_point(line.start);
            let (x2, y2) = dpi.scale_point(line.end);
            args.push("-draw".into());
            args.push(format!("line {},{} {},{}", x1, y1, x2, y2));
        }
    }

    args.extend(["-stroke", "none", "-fill", "black"].map(String::from));
    args.extend(["-pointsize".into(), dpi.scale(layout.font_size).to_string()]);

    let mut gravity: Option<Gravity> = None;
    for command in &layout.commands {
        if let DrawCommand::Text { position, angle, gravity: label_gravity, content } = command {
            if gravity != Some(*label_gravity) {
                gravity = Some(*label_gravity);
                args.extend(["-gravity", label_gravity.as_str()].map(String::from));
            }
            let (x, y) = dpi.scale_point(*position);
            let geometry = if *angle == 0.0 {
                format!("{:+}{:+}", x, y)
            } else {
                let angle = angle.rem_euclid(360.0);
                format!("{:.3}x{:.3}{:+}{:+}", angle, angle, x, y)
            };
            args.extend([String::from("-annotate"), geometry, escape_text(content)]);
        }
    }

    args.push(path_arg(output));

    RenderInstructions {
        args,
        output: output.to_path_buf(),
    }
}

pub fn build_legend_instructions(
    dimensions: ImageDimensions,
    params: &LegendParams,
    catalog: &dyn SwatchCatalog,
    input: &Path,
    output: &Path,
) -> AnnotateResult<RenderInstructions> {
    let recipe = compose_legend(dimensions, params, catalog)?;
    Ok(serialize_legend(&recipe, input, output))
}

fn label_args(label: &LegendLabel) -> Vec<String> {
    // The inner crop trims the padding that faces the swatch, the outer crop
    // the padding that faces away from it.
    let (first_crop, second_crop) = match label.edge {
        LabelEdge::Top => (format!("+0+{}", label.inner_crop), format!("+0-{}", label.outer_crop)),
        LabelEdge::Bottom => (format!("+0-{}", label.inner_crop), format!("+0+{}", label.outer_crop)),
    };

    vec![
        "(".into(),
        format!("label:{}", escape_text(&label.text)),
        "-trim".into(),
        "+repage".into(),
        "-border".into(),
        format!("{}x{}", label.horizontal_padding, label.vertical_border),
        "-crop".into(),
        first_crop,
        "-crop".into(),
        second_crop,
        "+repage".into(),
        ")".into(),
    ]
}

pub fn serialize_legend(recipe: &LegendRecipe, input: &Path, output: &Path) -> RenderInstructions {
    let mut args: Vec<String> = vec![
        path_arg(input),
        "-background".into(),
        "none".into(),
        "-gravity".into(),
        "center".into(),
        "-stroke".into(),
        "none".into(),
        "-fill".into(),
        "black".into(),
        "-pointsize".into(),
        recipe.font_size.to_string(),
        "(".into(),
        path_arg(&recipe.swatch),
        "-resize".into(),
        format!("x{}", recipe.swatch_height),
        "-resize".into(),
        format!("{}x100%", recipe.swatch_width_percent),
        "-bordercolor".into(),
        "gray50".into(),
        "-border".into(),
        "1".into(),
        "-bordercolor".into(),
        "none".into(),
    ];

    args.extend(label_args(&recipe.top_label));
    args.extend(["+swap", "-append"].map(String::from));
    args.extend(label_args(&recipe.bottom_label));
    args.extend(["-append", ")", "+append"].map(String::from));
    args.push(path_arg(output));

    RenderInstructions {
        args,
        output: output.to_path_buf(),
    }
}

pub fn build_resize_instructions(params: &ResizeParams, input: &Path, output: &Path) -> RenderInstructions {
    let args = vec![
        path_arg(input),
        "-filter".into(),
        "Lanczos".into(),
        "-sampling-factor".into(),
        "1x1".into(),
        "-resize".into(),
        format!("{}%", params.percentage),
        "-unsharp".into(),
        "1.5x1+0.7+0.02".into(),
        path_arg(output),
    ];

    RenderInstructions {
        args,
        output: output.to_path_buf(),
    }
}
