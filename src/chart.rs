//! Trend chart model
//!
//! Turns a [`TrendSeries`] into the two-series chart selected by the current
//! [`ChartMetric`], and owns the canvas slot the chart is drawn into.

use crate::api::types::TrendSeries;
use crate::filters::ChartMetric;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

/// How values on the y axis are scaled and printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    /// 0..=100, printed with a `%` suffix
    Percentage,
    /// Unbounded raw count
    Count,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: &'static str,
    pub values: Vec<f64>,
    /// Payments behind each point of this series
    pub payment_counts: Vec<u64>,
}

impl ChartSeries {
    /// `(x, y)` pairs for a line dataset.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect()
    }
}

/// Text shown for the point under the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub label: String,
    pub lines: Vec<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub metric: ChartMetric,
    pub kind: ChartKind,
    pub mode: ValueMode,
    pub labels: Vec<String>,
    pub series: [ChartSeries; 2],
    pub y_bounds: [f64; 2],
    total_counts: Vec<u64>,
}

impl TrendChart {
    pub fn build(metric: ChartMetric, trend: &TrendSeries) -> Self {
        let (kind, mode, paco, fran) = match metric {
            ChartMetric::AutomatedPercentage => (
                ChartKind::Line,
                ValueMode::Percentage,
                &trend.paco_percentages,
                &trend.fran_percentages,
            ),
            ChartMetric::CustomersPercentage => (
                ChartKind::Line,
                ValueMode::Percentage,
                &trend.paco_customers_percentages,
                &trend.fran_customers_percentages,
            ),
            ChartMetric::InvoicesPercentage => (
                ChartKind::Bar,
                ValueMode::Count,
                &trend.paco_invoices,
                &trend.fran_invoices,
            ),
        };

        let series = [
            ChartSeries {
                name: "PACO",
                values: paco.clone(),
                payment_counts: counts_or_total(&trend.paco_payment_counts, &trend.payment_counts),
            },
            ChartSeries {
                name: "FRAN",
                values: fran.clone(),
                payment_counts: counts_or_total(&trend.fran_payment_counts, &trend.payment_counts),
            },
        ];

        let y_bounds = match mode {
            ValueMode::Percentage => [0.0, 100.0],
            ValueMode::Count => {
                let max = series
                    .iter()
                    .flat_map(|s| s.values.iter().copied())
                    .fold(0.0_f64, f64::max);
                // Keep a usable axis when every value is zero
                [0.0, if max > 0.0 { max * 1.1 } else { 1.0 }]
            }
        };

        Self {
            metric,
            kind,
            mode,
            labels: trend.labels.clone(),
            series,
            y_bounds,
            total_counts: trend.payment_counts.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.metric.title()
    }

    /// Number of points along the x axis.
    pub fn len(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.values.len())
            .max()
            .unwrap_or(0)
            .max(self.labels.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format_value(&self, value: f64) -> String {
        match self.mode {
            ValueMode::Percentage => format!("{value:.1}%"),
            ValueMode::Count => format!("{}", value.round() as i64),
        }
    }

    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        if index >= self.len() {
            return None;
        }
        let label = self
            .labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("#{}", index + 1));

        let lines = self
            .series
            .iter()
            .map(|series| {
                let value = series
                    .values
                    .get(index)
                    .map(|v| self.format_value(*v))
                    .unwrap_or_else(|| "-".to_string());
                match series.payment_counts.get(index) {
                    Some(count) => format!("{}: {} ({} payments)", series.name, value, count),
                    None => format!("{}: {}", series.name, value),
                }
            })
            .collect();

        let footer = self
            .total_counts
            .get(index)
            .map(|count| format!("Total Payments: {}", count));

        Some(Tooltip {
            label,
            lines,
            footer,
        })
    }
}

fn counts_or_total(per_series: &[u64], total: &[u64]) -> Vec<u64> {
    if per_series.is_empty() {
        total.to_vec()
    } else {
        per_series.to_vec()
    }
}

/// The single slot a trend chart is drawn into. Mounting a chart releases
/// whatever instance the slot held before.
#[derive(Debug, Default)]
pub struct ChartCanvas {
    current: Option<TrendChart>,
    created: u64,
    destroyed: u64,
    cursor: usize,
}

impl ChartCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, chart: TrendChart) {
        self.release();
        self.cursor = self.cursor.min(chart.len().saturating_sub(1));
        self.current = Some(chart);
        self.created += 1;
        log::debug!("Mounted trend chart #{}", self.created);
    }

    pub fn release(&mut self) {
        if self.current.take().is_some() {
            self.destroyed += 1;
        }
    }

    pub fn chart(&self) -> Option<&TrendChart> {
        self.current.as_ref()
    }

    /// Chart instances currently alive; never more than one.
    pub fn live_instances(&self) -> u64 {
        self.created - self.destroyed
    }

    #[cfg(test)]
    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.current.as_ref().map_or(0, TrendChart::len);
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        self.current.as_ref()?.tooltip(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend() -> TrendSeries {
        TrendSeries {
            labels: vec!["Mar 03".into(), "Mar 04".into(), "Mar 05".into()],
            paco_percentages: vec![80.0, 82.5, 90.0],
            fran_percentages: vec![60.0, 61.0, 70.0],
            paco_customers_percentages: vec![95.0, 96.0, 97.0],
            fran_customers_percentages: vec![85.0, 86.0, 87.0],
            paco_invoices: vec![10.0, 40.0, 25.0],
            fran_invoices: vec![5.0, 20.0, 30.0],
            payment_counts: vec![20, 30, 40],
            paco_payment_counts: vec![12, 18, 25],
            fran_payment_counts: vec![],
        }
    }

    #[test]
    fn test_percentage_metrics_are_line_charts_bounded_to_100() {
        for metric in [
            ChartMetric::AutomatedPercentage,
            ChartMetric::CustomersPercentage,
        ] {
            let chart = TrendChart::build(metric, &trend());
            assert_eq!(chart.kind, ChartKind::Line);
            assert_eq!(chart.mode, ValueMode::Percentage);
            assert_eq!(chart.y_bounds, [0.0, 100.0]);
        }
        let chart = TrendChart::build(ChartMetric::CustomersPercentage, &trend());
        assert_eq!(chart.series[0].values, vec![95.0, 96.0, 97.0]);
    }

    #[test]
    fn test_invoices_metric_is_bar_chart_with_headroom() {
        let chart = TrendChart::build(ChartMetric::InvoicesPercentage, &trend());
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.mode, ValueMode::Count);
        assert!((chart.y_bounds[1] - 44.0).abs() < 1e-9);
    }

    #[test]
    fn test_tooltip_reports_per_series_counts_with_fallback() {
        let chart = TrendChart::build(ChartMetric::AutomatedPercentage, &trend());
        let tooltip = chart.tooltip(1).unwrap();
        assert_eq!(tooltip.label, "Mar 04");
        assert_eq!(
            tooltip.lines,
            vec!["PACO: 82.5% (18 payments)", "FRAN: 61.0% (30 payments)"]
        );
        assert_eq!(tooltip.footer.as_deref(), Some("Total Payments: 30"));
        assert!(chart.tooltip(3).is_none());
    }

    #[test]
    fn test_empty_trend_still_renders() {
        let chart = TrendChart::build(ChartMetric::InvoicesPercentage, &TrendSeries::default());
        assert!(chart.is_empty());
        assert_eq!(chart.y_bounds, [0.0, 1.0]);
    }

    #[test]
    fn test_canvas_releases_previous_chart() {
        let mut canvas = ChartCanvas::new();
        for metric in ChartMetric::ALL.into_iter().cycle().take(7) {
            canvas.mount(TrendChart::build(metric, &trend()));
            assert_eq!(canvas.live_instances(), 1);
        }
        assert_eq!(canvas.created(), 7);
        canvas.release();
        assert_eq!(canvas.live_instances(), 0);
    }

    #[test]
    fn test_cursor_stays_on_the_axis() {
        let mut canvas = ChartCanvas::new();
        canvas.mount(TrendChart::build(ChartMetric::AutomatedPercentage, &trend()));
        canvas.move_cursor_left();
        assert_eq!(canvas.cursor(), 0);
        for _ in 0..5 {
            canvas.move_cursor_right();
        }
        assert_eq!(canvas.cursor(), 2);
        assert_eq!(canvas.tooltip().unwrap().label, "Mar 05");
    }
}
