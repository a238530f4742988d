//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for a statement:
//! - **Monthly Spending Chart**: Stacked bar chart of category totals per month
//! - **Category Chart**: Pie chart of category totals across the date window
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.
//! Clicking a segment of the monthly chart loads the transactions behind it.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, Emphasis, EmphasisFocus,
        ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    category::CategoryColors,
    dashboard::{
        aggregation::{MonthRow, category_series},
        pie::PieDatum,
    },
    endpoints,
};

/// The ID of the element that the drill-down table is loaded into.
pub(super) const DETAILS_TARGET_ID: &str = "details";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
    /// Whether clicking a bar loads the transactions behind it.
    pub drill_down: bool,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }

        (charts_script(charts))
    )
}

/// Generates the JavaScript that initializes the dashboard charts.
///
/// The script is rendered inline next to the chart containers so that it runs
/// again whenever htmx swaps in new dashboard content. Any chart already
/// attached to a container is disposed first.
pub(super) fn charts_script(charts: &[DashboardChart]) -> Markup {
    let script_content = charts
        .iter()
        .map(|chart| {
            let click_handler = if chart.drill_down {
                format!(
                    r#"chart.on('click', function(params) {{
                        if (params.componentType !== 'series') return;
                        const query = new URLSearchParams({{
                            month: params.name,
                            category: params.seriesName
                        }});
                        htmx.ajax('GET', '{}?' + query.toString(), {{
                            target: '#{}',
                            swap: 'innerHTML'
                        }});
                    }});"#,
                    endpoints::DASHBOARD_DETAILS,
                    DETAILS_TARGET_ID
                )
            } else {
                String::new()
            };

            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) return;
                    const existing = echarts.getInstanceByDom(chartDom);
                    if (existing) existing.dispose();
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);
                    {}

                    window.addEventListener('resize', function() {{ chart.resize(); }});

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options, click_handler
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "(function() {{\n\
            const initCharts = function() {{\n{script_content}\n}};\n\
            if (document.readyState === 'loading') {{\n\
                document.addEventListener('DOMContentLoaded', initCharts);\n\
            }} else {{\n\
                initCharts();\n\
            }}\n\
        }})();"
    );

    html!(script { (PreEscaped(wrapped_script)) })
}

/// Builds the stacked bar chart of category totals per month.
///
/// There is one series per category in `selected` that has a total in at
/// least one month, drawn in the category's color. Income is never shown.
pub(super) fn monthly_spending_chart(
    rows: &[MonthRow],
    selected: &[String],
    colors: &CategoryColors,
) -> Chart {
    let labels: Vec<String> = rows.iter().map(|row| row.month.clone()).collect();
    let series_data = category_series(rows, selected);

    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Monthly Spending")
                .subtext("Grouped by category, click a bar for details")
                .left(20)
                .top("1%"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for (category, data) in series_data {
        let color = colors.get(&category);

        chart = chart.series(
            bar::Bar::new()
                .name(category)
                .stack("Spending")
                .item_style(ItemStyle::new().color(color))
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

/// Builds the pie chart of category totals for the selected categories.
pub(super) fn category_pie_chart(pie: &[PieDatum], colors: &CategoryColors) -> Chart {
    let palette: Vec<Color> = pie
        .iter()
        .map(|datum| Color::from(colors.get(&datum.id)))
        .collect();

    let data: Vec<(f64, &str)> = pie
        .iter()
        .map(|datum| (datum.value as f64, datum.label.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Spending by Category")
                .subtext("Selected categories in the date range")
                .left(20)
                .top("1%"),
        )
        .color(palette)
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["35%", "65%"])
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-GB', {
              style: 'currency',
              currency: 'GBP',
              maximumFractionDigits: 0
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use crate::{
        category::{CategoryColors, extract_categories},
        dashboard::{aggregation::aggregate_by_month, pie::aggregate_pie},
        endpoints,
        transaction::Transaction,
    };

    use super::{DashboardChart, category_pie_chart, charts_script, monthly_spending_chart};

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction::build("tx_01", "01/03/2024", "Card payment", "groceries", "-25.40"),
            Transaction::build("tx_02", "05/03/2024", "Faster payment", "income", "2000"),
            Transaction::build("tx_03", "10/04/2024", "Card payment", "transport", "-2.80"),
        ]
    }

    #[test]
    fn monthly_chart_has_one_series_per_selected_category() {
        let transactions = transactions();
        let refs: Vec<&Transaction> = transactions.iter().collect();
        let rows = aggregate_by_month(&refs);
        let categories = extract_categories(&transactions);
        let colors = CategoryColors::new(&categories);

        let options = monthly_spending_chart(&rows, &["groceries".to_owned()], &colors).to_string();

        assert!(options.contains("\"groceries\""));
        assert!(options.contains(colors.get("groceries")));
        assert!(!options.contains("\"transport\""));
        assert!(!options.contains("\"income\""));
        assert!(options.contains("3/2024"));
        assert!(options.contains("4/2024"));
    }

    #[test]
    fn pie_chart_uses_category_colors() {
        let transactions = transactions();
        let refs: Vec<&Transaction> = transactions.iter().collect();
        let rows = aggregate_by_month(&refs);
        let categories = extract_categories(&transactions);
        let colors = CategoryColors::new(&categories);
        let pie = aggregate_pie(&rows, &categories);

        let options = category_pie_chart(&pie, &colors).to_string();

        assert!(options.contains("\"transport\""));
        assert!(options.contains(colors.get("transport")));
        assert!(!options.contains("\"income\""));
    }

    #[test]
    fn only_drill_down_charts_load_details_on_click() {
        let charts = [
            DashboardChart {
                id: "bar-chart",
                options: "{}".to_owned(),
                drill_down: true,
            },
            DashboardChart {
                id: "pie-chart",
                options: "{}".to_owned(),
                drill_down: false,
            },
        ];

        let script = charts_script(&charts).into_string();

        assert_eq!(script.matches("chart.on('click'").count(), 1);
        assert!(script.contains(endpoints::DASHBOARD_DETAILS));
        assert!(script.contains("\"bar-chart\""));
        assert!(script.contains("\"pie-chart\""));
    }
}
