//! The seven day sales chart shown on the records, member and print dashboards.
//!
//! The chart options are generated with charming and rendered by ECharts in
//! the browser. The chart container and its initialization script are
//! rendered together, so a chart swapped in by htmx is initialized the same
//! way as one in a full page load.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::bar::Bar,
};
use maud::{Markup, PreEscaped, html};
use time::macros::format_description;

use crate::{html::HeadElement, transaction::DailySales};

/// The ECharts build loaded by pages with a chart.
const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

/// The element ID of the sales chart container.
pub const SALES_CHART_ID: &str = "sales-chart";

/// The script tag that loads ECharts, to be placed in the page head.
pub fn echarts_script() -> HeadElement {
    HeadElement::ScriptLink(ECHARTS_URL.to_owned())
}

/// Bar chart options for the PAID sales of each day in `daily_sales`.
pub fn sales_chart(daily_sales: &[DailySales]) -> Chart {
    let label_format = format_description!("[month repr:short] [day]");
    let labels: Vec<String> = daily_sales
        .iter()
        .map(|day| {
            day.date
                .format(label_format)
                .unwrap_or_else(|_| day.date.to_string())
        })
        .collect();
    let values: Vec<f64> = daily_sales.iter().map(|day| day.total).collect();

    Chart::new()
        .title(Title::new().text("Sales").subtext("Paid loads, last seven days"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(peso_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(peso_formatter())),
        )
        .series(Bar::new().name("Sales").data(values))
}

/// Render the chart container and the script that draws `chart` into it.
///
/// Any chart already drawn in the container is disposed first, since htmx
/// re-runs the script every time it swaps in new page content. A single
/// window resize listener is shared by every chart on the page.
pub fn chart_view(id: &str, chart: &Chart) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{id}");
            if (!chartDom || typeof echarts === "undefined") {{
                return;
            }}
            echarts.getInstanceByDom(chartDom)?.dispose();
            const chart = echarts.init(chartDom);
            chart.setOption({options});
            if (!window.chartResizeListener) {{
                window.chartResizeListener = () => {{
                    document.querySelectorAll("[data-chart]").forEach((element) => {{
                        echarts.getInstanceByDom(element)?.resize();
                    }});
                }};
                window.addEventListener('resize', window.chartResizeListener);
            }}
        }})();"#,
        options = chart
    );

    html! {
        section class="w-full mb-4"
        {
            div
                id=(id)
                data-chart="bar"
                class="min-h-[320px] w-full rounded bg-white dark:bg-gray-100 print:min-h-[280px]"
            {}

            script { (PreEscaped(script)) }
        }
    }
}

#[inline]
fn peso_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-PH', {
              style: 'currency',
              currency: 'PHP'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
