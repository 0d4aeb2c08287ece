use std::path::Path;

use cardiogate_core::gating::{AppConfig, GatingSession, GatingTraces, PeakMode, Phase};
use cardiogate_core::range::format_frame_ranges;
use cardiogate_core::signal::SignalKind;
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    diastole: Style,
    systole: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            diastole: Style::new().blue().bold(),
            systole: Style::new().red().bold(),
        }
    }
}

pub fn print_gating_summary(
    frames: &Path,
    report: &Path,
    config: &AppConfig,
    frame_rate: f64,
    total_frames: usize,
    traces: &GatingTraces,
) {
    let s = Styles::new();
    let g = &config.gating;

    println!();
    println!("  {}", s.title.apply_to("Cardiogate"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(10)));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Frames"), s.path.apply_to(frames.display()));
    println!("  {:<14}{}", s.label.apply_to("Report"), s.path.apply_to(report.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Range"),
        s.value.apply_to(format!(
            "{}-{} of {}",
            traces.range.lower + 1,
            traces.range.upper,
            total_frames
        ))
    );
    println!();

    println!("  {}", s.header.apply_to("Signals"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Band-pass"),
        s.value.apply_to(format!(
            "{:.2}-{:.2} Hz, order {} at {:.1} fps",
            g.lowcut, g.highcut, g.order, frame_rate
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Smoothing"),
        s.value.apply_to(format!("{} frames", g.window_size))
    );
    print_weights(&s, "Image", SignalKind::MAXIMA_GROUP, &traces.scaled.maxima.weights);
    print_weights(&s, "Contour", SignalKind::EXTREMA_GROUP, &traces.scaled.extrema.weights);
    match traces.scaled.factor_diff {
        Some(f) => println!(
            "    {:<12}{}",
            s.label.apply_to("Scale"),
            s.value.apply_to(format!("{f:.3}"))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Scale"),
            s.disabled.apply_to("not aligned")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Peaks"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Mode"),
        s.method.apply_to(PeakMode::from(g.both_extrema))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Height"),
        s.value.apply_to(format!("{}th percentile", g.min_height_percentile))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Distance"),
        s.value.apply_to(format!("{} frames", g.min_distance))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Match"),
        s.value.apply_to(format!("within {} frames", g.auto_gating_threshold))
    );
    println!();
}

fn print_weights(s: &Styles, group: &str, kinds: &[SignalKind], weights: &[f64]) {
    let parts: Vec<String> = kinds
        .iter()
        .zip(weights)
        .map(|(k, w)| format!("{k} {w:.2}"))
        .collect();
    println!(
        "    {:<12}{}",
        s.label.apply_to(group),
        s.value.apply_to(parts.join(", "))
    );
}

pub fn print_gating_result(session: &GatingSession) {
    let s = Styles::new();

    println!("  {}", s.header.apply_to("Result"));
    for phase in [Phase::Diastole, Phase::Systole] {
        let numbers: Vec<usize> = session.frames(phase).iter().map(|i| i + 1).collect();
        let style = match phase {
            Phase::Diastole => &s.diastole,
            Phase::Systole => &s.systole,
        };
        if numbers.is_empty() {
            println!(
                "    {:<12}{}",
                style.apply_to(phase),
                s.disabled.apply_to("none")
            );
        } else {
            println!(
                "    {:<12}{} {}",
                style.apply_to(phase),
                s.value.apply_to(numbers.len()),
                s.label.apply_to(format!("({})", format_frame_ranges(&numbers)))
            );
        }
    }
    println!();
}
