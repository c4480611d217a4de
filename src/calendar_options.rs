use serde::{Deserialize, Serialize};
use serde_json::Value;

const WRITABLE_ACCESS_ROLES: [&str; 2] = ["owner", "writer"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalendarOption {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) summary: Option<String>,
    #[serde(default)]
    pub(crate) primary: bool,
    #[serde(default)]
    pub(crate) access_role: Option<String>,
}

impl CalendarOption {
    pub(crate) fn is_writable(&self) -> bool {
        self.access_role
            .as_deref()
            .is_some_and(|role| WRITABLE_ACCESS_ROLES.contains(&role))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BackendSettings {
    #[serde(default)]
    pub(crate) selected_calendar_id: Option<String>,
}

impl BackendSettings {
    pub(crate) fn from_data(data: Option<&Value>) -> Self {
        data.and_then(|value| serde_json::from_value::<Self>(value.clone()).ok())
            .map(|settings| Self {
                selected_calendar_id: settings.selected_calendar_id.filter(|id| !id.is_empty()),
            })
            .unwrap_or_default()
    }
}

/// Reads `{calendars: [...]}`, dropping entries that are not calendar objects
/// with an id.
pub(crate) fn calendars_from_data(data: Option<&Value>) -> Vec<CalendarOption> {
    data.and_then(|value| value.get("calendars"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value::<CalendarOption>(item.clone()).ok())
                .filter(|calendar| !calendar.id.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn writable_calendars(calendars: Vec<CalendarOption>) -> Vec<CalendarOption> {
    calendars
        .into_iter()
        .filter(CalendarOption::is_writable)
        .collect()
}

pub(crate) fn primary_calendar_id(calendars: &[CalendarOption]) -> Option<&str> {
    calendars
        .iter()
        .find(|calendar| calendar.primary)
        .map(|calendar| calendar.id.as_str())
}

/// Steps through `calendars` from `current`, wrapping at both ends.
pub(crate) fn cycle_calendar_id<'a>(
    calendars: &'a [CalendarOption],
    current: Option<&str>,
    step: i32,
) -> Option<&'a str> {
    if calendars.is_empty() || step == 0 {
        return None;
    }

    let len = calendars.len() as i64;
    let current_index = current.and_then(|id| calendars.iter().position(|item| item.id == id));
    let next_index = match current_index {
        Some(index) => (index as i64 + i64::from(step)).rem_euclid(len),
        None if step > 0 => i64::from(step - 1).rem_euclid(len),
        None => (len + i64::from(step)).rem_euclid(len),
    };
    calendars
        .get(next_index as usize)
        .map(|calendar| calendar.id.as_str())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn calendar(id: &str, role: &str, primary: bool) -> CalendarOption {
        CalendarOption {
            id: id.to_string(),
            summary: Some(id.to_uppercase()),
            primary,
            access_role: Some(role.to_string()),
        }
    }

    #[test]
    fn calendars_from_data_reads_backend_payload() {
        let data = json!({
            "calendars": [
                { "id": "me@example.com", "summary": "Me", "primary": true, "accessRole": "owner" },
                { "id": "holidays", "summary": "Holidays", "accessRole": "reader" },
                { "summary": "No id" },
                "garbage"
            ]
        });

        let calendars = calendars_from_data(Some(&data));
        assert_eq!(calendars.len(), 2);
        assert_eq!(calendars[0].id, "me@example.com");
        assert!(calendars[0].primary);
        assert_eq!(calendars[1].access_role.as_deref(), Some("reader"));
        assert!(!calendars[1].primary);
    }

    #[test]
    fn calendars_from_data_tolerates_missing_list() {
        assert!(calendars_from_data(None).is_empty());
        assert!(calendars_from_data(Some(&json!({ "calendars": "nope" }))).is_empty());
    }

    #[test]
    fn writable_calendars_keeps_owner_and_writer_only() {
        let filtered = writable_calendars(vec![
            calendar("a", "owner", true),
            calendar("b", "reader", false),
            calendar("c", "writer", false),
            calendar("d", "freeBusyReader", false),
        ]);
        let ids: Vec<_> = filtered.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn settings_from_data_ignores_empty_selection() {
        let stored = BackendSettings::from_data(Some(&json!({ "selectedCalendarId": "work" })));
        assert_eq!(stored.selected_calendar_id.as_deref(), Some("work"));

        let empty = BackendSettings::from_data(Some(&json!({ "selectedCalendarId": "" })));
        assert_eq!(empty.selected_calendar_id, None);
        assert_eq!(BackendSettings::from_data(None), BackendSettings::default());
    }

    #[test]
    fn cycle_calendar_id_wraps_in_both_directions() {
        let calendars = vec![
            calendar("a", "owner", true),
            calendar("b", "writer", false),
            calendar("c", "writer", false),
        ];

        assert_eq!(cycle_calendar_id(&calendars, Some("a"), 1), Some("b"));
        assert_eq!(cycle_calendar_id(&calendars, Some("c"), 1), Some("a"));
        assert_eq!(cycle_calendar_id(&calendars, Some("a"), -1), Some("c"));
        assert_eq!(cycle_calendar_id(&calendars, None, 1), Some("a"));
        assert_eq!(cycle_calendar_id(&calendars, None, -1), Some("c"));
        assert_eq!(cycle_calendar_id(&calendars, Some("gone"), 1), Some("a"));
        assert_eq!(cycle_calendar_id(&[], Some("a"), 1), None);
    }
}
