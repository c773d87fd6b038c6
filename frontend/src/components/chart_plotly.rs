use chrono::{DateTime, Local};
use plotly::{
    common::{Mode, Title},
    layout::{Axis, Margin},
    Configuration, Layout, Plot, Scatter,
};
use yew::prelude::*;

use crate::dataset::Series;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: AttrValue,
    pub series: Series,
}

#[function_component(ChartPlotly)]
pub fn chart_plotly(props: &Props) -> Html {
    let id = props.id.to_string();
    let p = yew_hooks::use_async::<_, _, ()>({
        let series = &props.series;
        let mut plot = Plot::new();
        let trace = Scatter::new(
            series
                .data
                .iter()
                .map(|(ts, _)| DateTime::<Local>::from(*ts))
                .collect(),
            series.data.iter().map(|(_, v)| *v).collect(),
        )
        .mode(Mode::LinesMarkers)
        .name(&series.name);
        plot.add_trace(trace);
        plot.set_configuration(
            Configuration::default()
                .display_logo(false)
                .editable(false)
                .display_mode_bar(plotly::configuration::DisplayModeBar::Hover),
        );
        plot.set_layout(
            Layout::default()
                .title(Title::new(&series.name))
                .hover_mode(plotly::layout::HoverMode::XUnified)
                .auto_size(true)
                .margin(Margin::default().top(40).bottom(40).left(50).right(20))
                .y_axis(Axis::new().title(Title::new(&series.unit))),
        );

        async move {
            plotly::bindings::new_plot(&id, &plot).await;
            Ok(())
        }
    });

    let empty = props.series.data.is_empty();
    use_effect_with(props.series.clone(), move |_| {
        if !empty {
            p.run();
        }
        || ()
    });

    if empty {
        return html! {
            <div class="chart chart-empty">{format!("No data for {}.", props.series.name)}</div>
        };
    }

    html! {
        <div class="chart" id={props.id.clone()}></div>
    }
}
