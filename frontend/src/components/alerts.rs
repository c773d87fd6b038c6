use std::time::Duration;

use chrono::{DateTime, Utc};
use common::req::{Alert, AlertLevel};
use yew::prelude::*;

use super::{list_banner, list_controls, list_status, refresh_button, use_list, use_lookups};
use crate::lookups::Lookups;

pub fn level_badge(level: AlertLevel) -> Html {
    let class = match level {
        AlertLevel::Danger => "label label-danger",
        AlertLevel::Warning => "label label-warning",
        AlertLevel::Info => "label label-info",
    };

    html! { <span {class}>{level.as_str()}</span> }
}

/// "3h 12m ago", rounded to the minute.
pub fn age(created_at: DateTime<Utc>) -> String {
    let secs = (Utc::now() - created_at).num_seconds().max(0) as u64;
    if secs < 60 {
        return "just now".to_owned();
    }
    format!("{} ago", humantime::format_duration(Duration::from_secs(secs - secs % 60)))
}

pub fn alert_rows(alerts: &[Alert], lookups: &Lookups) -> Html {
    if alerts.is_empty() {
        return html! {
            <tr><td colspan="6">{"No alerts."}</td></tr>
        };
    }

    alerts
        .iter()
        .map(|a| {
            html! {
                <tr key={a.id}>
                    <td>{level_badge(a.niveau)}</td>
                    <td>{a.type_alerte.clone()}</td>
                    <td>{a.message.clone()}</td>
                    <td>{lookups.optional_patient_label(a.patient)}</td>
                    <td>{lookups.optional_device_label(a.device)}</td>
                    <td title={a.created_at.to_rfc3339()}>{age(a.created_at)}</td>
                </tr>
            }
        })
        .collect()
}

pub fn alert_table(alerts: &[Alert], lookups: &Lookups) -> Html {
    html! {
        <table class="table table-hover">
            <thead>
                <tr>
                    <th>{"Level"}</th><th>{"Type"}</th><th>{"Message"}</th>
                    <th>{"Patient"}</th><th>{"Device"}</th><th>{"Raised"}</th>
                </tr>
            </thead>
            <tbody>{alert_rows(alerts, lookups)}</tbody>
        </table>
    }
}

#[function_component(Alerts)]
pub fn alerts() -> Html {
    let list = use_list::<Alert>();
    let lookups = use_lookups();

    let body = list_status(&list).unwrap_or_else(|| alert_table(&list.view().items, &lookups));

    html! {
        <>
            <div class="toolbar">
                {refresh_button(&list)}
            </div>
            {list_banner(&list)}
            {lookups.banner()}
            {body}
            {list_controls(&list, "alerts")}
        </>
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn age_rounds_to_minutes() {
        assert_eq!(age(Utc::now()), "just now");
        assert_eq!(age(Utc::now() + Duration::minutes(5)), "just now");
        assert_eq!(age(Utc::now() - Duration::seconds(3 * 3600 + 12 * 60 + 30)), "3h 12m ago");
    }
}
