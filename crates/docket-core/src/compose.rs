use crate::catalog::{CatalogName, TaskCatalog};
use crate::types::{CalendarDate, TaskRecord};

/// Catalogs that apply to `run_date`, in composition order.
///
/// `base` always comes first; `weekly` fires on the catalog's start-of-week
/// day and `month_start` on day 1. Order is fixed regardless of which
/// combination fires.
pub fn triggered_catalogs(catalog: &TaskCatalog, run_date: CalendarDate) -> Vec<CatalogName> {
    let mut names = vec![CatalogName::Base];
    if run_date.weekday() == catalog.start_of_week {
        names.push(CatalogName::Weekly);
    }
    if run_date.day() == 1 {
        names.push(CatalogName::MonthStart);
    }
    names
}

/// Build the ordered task list for `run_date`.
pub fn compose(catalog: &TaskCatalog, run_date: CalendarDate) -> Vec<TaskRecord> {
    let names = triggered_catalogs(catalog, run_date);
    tracing::debug!(
        run_date = %run_date,
        catalogs = ?names.iter().map(CatalogName::as_str).collect::<Vec<_>>(),
        "composing tasks"
    );
    names
        .into_iter()
        .flat_map(|name| catalog.tasks(name).iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use time::macros::date;
    use time::Weekday;

    fn descriptions(tasks: &[TaskRecord]) -> Vec<&str> {
        tasks.iter().map(|t| t.description.as_str()).collect()
    }

    #[test]
    fn plain_weekday_gets_base_only() {
        let c = default_catalog().unwrap();
        // Tuesday, mid-month
        let tasks = compose(&c, date!(2024 - 06 - 04));
        assert_eq!(tasks, c.base);
    }

    #[test]
    fn monday_adds_weekly_after_base() {
        let c = default_catalog().unwrap();
        let tasks = compose(&c, date!(2024 - 06 - 03));
        assert_eq!(tasks.len(), c.base.len() + c.weekly.len());
        assert_eq!(&tasks[..c.base.len()], c.base.as_slice());
        assert!(descriptions(&tasks)
            .iter()
            .any(|d| d.starts_with("Publish weekly freight and capacity snapshot")));
    }

    #[test]
    fn tuesday_excludes_weekly() {
        let c = default_catalog().unwrap();
        let tasks = compose(&c, date!(2024 - 06 - 04));
        assert!(!descriptions(&tasks)
            .iter()
            .any(|d| d.starts_with("Publish weekly freight")));
    }

    #[test]
    fn first_of_month_adds_month_start() {
        let c = default_catalog().unwrap();
        // 2024-07-01 is a Monday, so pick a non-Monday first: 2024-08-01 (Thursday)
        let tasks = compose(&c, date!(2024 - 08 - 01));
        assert_eq!(tasks.len(), c.base.len() + c.month_start.len());
        assert_eq!(&tasks[c.base.len()..], c.month_start.as_slice());

        let tasks = compose(&c, date!(2024 - 07 - 01));
        assert!(descriptions(&tasks)
            .iter()
            .any(|d| d.starts_with("Prepare month-start FTZ/CBP compliance review")));
        let tasks = compose(&c, date!(2024 - 07 - 02));
        assert!(!descriptions(&tasks)
            .iter()
            .any(|d| d.starts_with("Prepare month-start")));
    }

    #[test]
    fn combined_trigger_orders_weekly_before_month_start() {
        let c = default_catalog().unwrap();
        // 2024-07-01 is both a Monday and day 1
        let d = date!(2024 - 07 - 01);
        assert_eq!(
            triggered_catalogs(&c, d),
            vec![
                CatalogName::Base,
                CatalogName::Weekly,
                CatalogName::MonthStart
            ]
        );
        let tasks = compose(&c, d);
        let mut expected = c.base.clone();
        expected.extend(c.weekly.iter().cloned());
        expected.extend(c.month_start.iter().cloned());
        assert_eq!(tasks, expected);
    }

    #[test]
    fn start_of_week_is_read_from_catalog() {
        let mut c = default_catalog().unwrap();
        c.start_of_week = Weekday::Sunday;
        // 2024-06-02 is a Sunday, 2024-06-03 a Monday
        assert!(triggered_catalogs(&c, date!(2024 - 06 - 02)).contains(&CatalogName::Weekly));
        assert!(!triggered_catalogs(&c, date!(2024 - 06 - 03)).contains(&CatalogName::Weekly));
    }

    #[test]
    fn compose_is_deterministic() {
        let c = default_catalog().unwrap();
        let d = date!(2024 - 07 - 01);
        assert_eq!(compose(&c, d), compose(&c, d));
    }
}
