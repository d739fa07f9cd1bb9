use crate::min_and_max;
use crate::series::{AnalysisSeries, ConvergenceSeries, Series};
use plotters::coord::Shift;
use plotters::prelude::*;

pub const PURPLE: RGBColor = RGBColor(128, 0, 128);
pub const ORANGE: RGBColor = RGBColor(255, 140, 0);
pub const FOREST_GREEN: RGBColor = RGBColor(34, 139, 34);

/// How a single line is stroked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStyle {
    pub color: RGBColor,
    pub opacity: f64,
    pub width: u32,
    pub dashed: bool,
    /// opacity of the area between zero and the line, if filled
    pub fill: Option<f64>,
}

impl TraceStyle {
    pub fn solid(color: RGBColor, width: u32) -> TraceStyle {
        TraceStyle {
            color,
            opacity: 1.0,
            width,
            dashed: false,
            fill: None,
        }
    }

    pub fn dashed(color: RGBColor, width: u32) -> TraceStyle {
        TraceStyle {
            dashed: true,
            ..TraceStyle::solid(color, width)
        }
    }

    fn shape(&self) -> ShapeStyle {
        self.color.mix(self.opacity).stroke_width(self.width)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: TraceStyle,
}

impl Trace {
    fn new(label: &str, generation: &[i64], values: &[f64], style: TraceStyle) -> Trace {
        let points = generation
            .iter()
            .zip(values.iter())
            .map(|(&g, &v)| (g as f64, v))
            .collect();
        Trace {
            label: label.to_string(),
            points,
            style,
        }
    }
}

/// Horizontal marker across the whole x range of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
    pub style: TraceStyle,
}

impl ReferenceLine {
    pub fn optimal(value: f64) -> ReferenceLine {
        ReferenceLine {
            value,
            label: format!("Optimal (A*: {})", value),
            style: TraceStyle::dashed(FOREST_GREEN, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub caption: String,
    pub y_desc: String,
    /// only the bottom panel carries the shared x label
    pub x_desc: Option<String>,
    pub traces: Vec<Trace>,
    pub reference: Option<ReferenceLine>,
    pub legend: bool,
}

impl Panel {
    fn entries(&self) -> usize {
        self.traces.len() + self.reference.iter().count()
    }

    /// x range over all traces, with a small margin on both sides
    pub fn x_range(&self) -> (f64, f64) {
        let xs: Vec<f64> = self
            .traces
            .iter()
            .flat_map(|t| t.points.iter().map(|p| p.0))
            .collect();
        let (xmin, xmax) = min_and_max(&xs).unwrap_or((0., 1.));
        pad(xmin, xmax, 20.)
    }

    /// y range over all traces and the reference,
    /// filled traces also include their zero baseline
    pub fn y_range(&self) -> (f64, f64) {
        let mut ys: Vec<f64> = self
            .traces
            .iter()
            .flat_map(|t| t.points.iter().map(|p| p.1))
            .collect();
        if self.traces.iter().any(|t| t.style.fill.is_some()) {
            ys.push(0.);
        }
        if let Some(r) = &self.reference {
            ys.push(r.value);
        }
        let (ymin, ymax) = min_and_max(&ys).unwrap_or((0., 1.));
        pad(ymin, ymax, 10.)
    }
}

fn pad(min: f64, max: f64, parts: f64) -> (f64, f64) {
    let span = max - min;
    if span > 0. {
        (min - span / parts, max + span / parts)
    } else {
        let margin = if min.abs() > 0. { min.abs() / parts } else { 1. };
        (min - margin, max + margin)
    }
}

/// The whole report, independent of any drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub size: (u32, u32),
    pub title: Option<String>,
    pub panels: Vec<Panel>,
}

/// Lays out the panels of the series' variant
/// and puts the reference, when known, on the cost panel.
pub fn compose(series: &Series, reference: Option<f64>) -> Figure {
    let variant = series.variant();
    let reference = reference.map(ReferenceLine::optimal);
    match series {
        Series::Convergence(s) => Figure {
            size: variant.figure_size(),
            title: None,
            panels: vec![convergence_panel(variant.title(), s, reference)],
        },
        Series::Analysis(s) => Figure {
            size: variant.figure_size(),
            title: Some(variant.title().to_string()),
            panels: analysis_panels(s, reference),
        },
    }
}

fn convergence_panel(
    caption: &str,
    s: &ConvergenceSeries,
    reference: Option<ReferenceLine>,
) -> Panel {
    Panel {
        caption: caption.to_string(),
        y_desc: "Cost".to_string(),
        x_desc: Some("Generation".to_string()),
        traces: vec![Trace::new(
            "GA Best Cost",
            &s.generation,
            &s.cost,
            TraceStyle::solid(BLUE, 2),
        )],
        reference,
        legend: true,
    }
}

fn analysis_panels(s: &AnalysisSeries, reference: Option<ReferenceLine>) -> Vec<Panel> {
    let avg_style = TraceStyle {
        opacity: 0.5,
        ..TraceStyle::solid(BLUE, 1)
    };
    let diversity_style = TraceStyle {
        fill: Some(0.2),
        ..TraceStyle::solid(PURPLE, 2)
    };
    let mut panels = vec![
        Panel {
            caption: "Cost Convergence".to_string(),
            y_desc: "Cost".to_string(),
            x_desc: None,
            traces: vec![
                Trace::new("Average Cost", &s.generation, &s.avg_cost, avg_style),
                Trace::new(
                    "Best Cost",
                    &s.generation,
                    &s.best_cost,
                    TraceStyle::solid(RED, 3),
                ),
            ],
            reference,
            legend: false,
        },
        Panel {
            caption: "Population Diversity".to_string(),
            y_desc: "Std Dev".to_string(),
            x_desc: None,
            traces: vec![Trace::new(
                "Std Dev (Diversity)",
                &s.generation,
                &s.std_dev,
                diversity_style,
            )],
            reference: None,
            legend: false,
        },
        Panel {
            caption: "Temperature Schedule".to_string(),
            y_desc: "Temperature".to_string(),
            x_desc: Some("Generation".to_string()),
            traces: vec![Trace::new(
                "Temperature",
                &s.generation,
                &s.temperature,
                TraceStyle::dashed(ORANGE, 2),
            )],
            reference: None,
            legend: false,
        },
    ];
    for p in panels.iter_mut() {
        p.legend = p.entries() > 1;
    }
    panels
}

/// Draws the figure on the given area, one evenly sized row per panel.
/// All panels share the x range of the whole figure.
pub fn render<DB: DrawingBackend>(
    figure: &Figure,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let area = match &figure.title {
        Some(title) => root.titled(title, ("sans-serif", 32))?,
        None => root.clone(),
    };
    let xs: Vec<f64> = figure
        .panels
        .iter()
        .flat_map(|p| vec![p.x_range().0, p.x_range().1])
        .collect();
    let x_range = min_and_max(&xs).unwrap_or((0., 1.));
    let rows = area.split_evenly((figure.panels.len().max(1), 1));
    for (panel, row) in figure.panels.iter().zip(rows.iter()) {
        render_panel(panel, x_range, row)?;
    }
    root.present()?;
    Ok(())
}

fn render_panel<DB: DrawingBackend>(
    panel: &Panel,
    (xmin, xmax): (f64, f64),
    area: &DrawingArea<DB, Shift>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (ymin, ymax) = panel.y_range();
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.caption, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(if panel.x_desc.is_some() { 50 } else { 30 })
        .y_label_area_size(80)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)?;

    let xfmt = |x: &f64| format!("{:.0}", x);
    let yfmt = |y: &f64| format!("{:.1}", y);
    {
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(&RGBColor(235, 235, 235))
            .bold_line_style(RGBColor(200, 200, 200).stroke_width(1))
            .label_style(("sans-serif", 16))
            .y_desc(panel.y_desc.as_str())
            .x_label_formatter(&xfmt)
            .y_label_formatter(&yfmt);
        if let Some(x_desc) = &panel.x_desc {
            mesh.x_desc(x_desc.as_str());
        }
        mesh.draw()?;
    }

    for trace in panel.traces.iter() {
        let style = trace.style.shape();
        if let Some(alpha) = trace.style.fill {
            chart.draw_series(
                AreaSeries::new(
                    trace.points.iter().copied(),
                    0.0,
                    &trace.style.color.mix(alpha),
                )
                .border_style(style),
            )?;
        }
        let anno = if trace.style.dashed {
            chart.draw_series(DashedLineSeries::new(
                trace.points.clone().into_iter(),
                8,
                5,
                style,
            ))?
        } else {
            chart.draw_series(LineSeries::new(trace.points.iter().copied(), style))?
        };
        anno.label(trace.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    if let Some(reference) = &panel.reference {
        let style = reference.style.shape();
        chart
            .draw_series(DashedLineSeries::new(
                vec![(xmin, reference.value), (xmax, reference.value)].into_iter(),
                8,
                5,
                style,
            ))?
            .label(reference.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    if panel.legend {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(("sans-serif", 16))
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{AnalysisSeries, ConvergenceSeries};

    fn convergence() -> Series {
        Series::Convergence(ConvergenceSeries {
            generation: vec![0, 1, 2],
            cost: vec![100., 80., 80.],
        })
    }

    fn analysis() -> Series {
        Series::Analysis(AnalysisSeries {
            generation: vec![0, 1, 2, 3],
            avg_cost: vec![150., 130., 120., 118.],
            best_cost: vec![100., 90., 85., 85.],
            std_dev: vec![20., 12., 6., 4.],
            temperature: vec![1000., 900., 810., 729.],
        })
    }

    #[test]
    fn convergence_line_with_reference() {
        let figure = compose(&convergence(), Some(75.));
        assert_eq!(figure.panels.len(), 1);
        let panel = &figure.panels[0];
        assert_eq!(panel.traces.len(), 1);
        assert_eq!(
            panel.traces[0].points,
            vec![(0., 100.), (1., 80.), (2., 80.)]
        );
        assert_eq!(panel.traces[0].style.color, BLUE);
        let reference = panel.reference.as_ref().unwrap();
        assert_eq!(reference.value, 75.);
        assert!(reference.style.dashed);
        assert_eq!(reference.label, "Optimal (A*: 75)");
        assert!(panel.legend);
        assert_eq!(panel.x_desc.as_deref(), Some("Generation"));
        assert_eq!(panel.y_desc, "Cost");
    }

    #[test]
    fn convergence_without_reference() {
        let figure = compose(&convergence(), None);
        assert!(figure.panels[0].reference.is_none());
        assert!(figure.panels[0].legend);
    }

    #[test]
    fn analysis_has_three_stacked_panels() {
        let figure = compose(&analysis(), None);
        let captions: Vec<&str> = figure.panels.iter().map(|p| p.caption.as_str()).collect();
        assert_eq!(
            captions,
            vec!["Cost Convergence", "Population Diversity", "Temperature Schedule"]
        );
        assert!(figure.panels[0].reference.is_none());
        let x_descs: Vec<bool> = figure.panels.iter().map(|p| p.x_desc.is_some()).collect();
        assert_eq!(x_descs, vec![false, false, true]);
        assert_eq!(figure.panels[2].y_desc, "Temperature");
        assert!(figure.panels[2].traces[0].style.dashed);
        assert_eq!(figure.panels[1].traces[0].style.fill, Some(0.2));
    }

    #[test]
    fn analysis_legends_only_with_several_entries() {
        let figure = compose(&analysis(), Some(80.));
        let legends: Vec<bool> = figure.panels.iter().map(|p| p.legend).collect();
        assert_eq!(legends, vec![true, false, false]);
        assert_eq!(figure.panels[0].reference.as_ref().unwrap().value, 80.);
        assert!(figure.panels[1].reference.is_none());
    }

    #[test]
    fn every_trace_uses_generation_as_x() {
        let figure = compose(&analysis(), None);
        for panel in figure.panels.iter() {
            for trace in panel.traces.iter() {
                let xs: Vec<f64> = trace.points.iter().map(|p| p.0).collect();
                assert_eq!(xs, vec![0., 1., 2., 3.]);
            }
        }
    }

    #[test]
    fn y_range_includes_reference() {
        let figure = compose(&convergence(), Some(20.));
        let (ymin, ymax) = figure.panels[0].y_range();
        assert!(ymin < 20.);
        assert!(ymax > 100.);
    }

    #[test]
    fn filled_panel_includes_zero() {
        let figure = compose(&analysis(), None);
        let (ymin, _) = figure.panels[1].y_range();
        assert!(ymin < 0.);
    }

    #[test]
    fn single_generation_has_valid_ranges() {
        let series = Series::Convergence(ConvergenceSeries {
            generation: vec![7],
            cost: vec![50.],
        });
        let figure = compose(&series, None);
        let (xmin, xmax) = figure.panels[0].x_range();
        let (ymin, ymax) = figure.panels[0].y_range();
        assert!(xmin < 7. && 7. < xmax);
        assert!(ymin < 50. && 50. < ymax);
    }

    #[test]
    fn convergence_caption_is_the_report_title() {
        let figure = compose(&convergence(), None);
        assert_eq!(figure.panels[0].caption, "GA Convergence Analysis");
        assert!(figure.title.is_none());
    }

    fn render_svg(figure: &Figure) -> String {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, figure.size).into_drawing_area();
            render(figure, &root).unwrap();
        }
        svg
    }

    #[test]
    fn rendered_convergence_shows_reference_label() {
        let svg = render_svg(&compose(&convergence(), Some(75.)));
        assert!(svg.contains("GA Best Cost"));
        assert!(svg.contains("Optimal (A*: 75)"));
    }

    #[test]
    fn rendered_analysis_has_every_panel_without_reference() {
        let svg = render_svg(&compose(&analysis(), None));
        for caption in &[
            "GA Performance Analysis",
            "Cost Convergence",
            "Population Diversity",
            "Temperature Schedule",
        ] {
            assert!(svg.contains(caption), "missing {}", caption);
        }
        assert!(!svg.contains("Optimal"));
    }

    #[test]
    fn composing_twice_is_identical() {
        assert_eq!(compose(&analysis(), Some(80.)), compose(&analysis(), Some(80.)));
    }
}
