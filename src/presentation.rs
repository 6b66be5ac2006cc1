//! Display ordering and row activation, independent of the terminal frontend.

use crate::model::{AppRecord, SortOrder};
use crate::registry::AppRegistry;

/// Luma weights of a saturation-0 colour matrix.
const LUMA_R: f32 = 0.213;
const LUMA_G: f32 = 0.715;
const LUMA_B: f32 = 0.072;

/// Stable ascending sort by display name. Records with equal names are all kept.
pub fn sort_for_display(mut apps: Vec<AppRecord>, order: SortOrder) -> Vec<AppRecord> {
    match order {
        SortOrder::CaseSensitive => apps.sort_by(|a, b| a.display_name.cmp(&b.display_name)),
        // Lowercased once per record; the raw name breaks ties between case variants.
        SortOrder::CaseInsensitive => apps.sort_by_cached_key(|a| {
            (a.display_name.to_lowercase(), a.display_name.clone())
        }),
    }
    apps
}

/// Grayscale value of an RGB pixel.
pub fn desaturate(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * f32::from(r) + LUMA_G * f32::from(g) + LUMA_B * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

/// The ordered rows of one discovery pass.
#[derive(Debug, Clone, Default)]
pub struct AppList {
    rows: Vec<AppRecord>,
}

impl AppList {
    pub fn new(apps: Vec<AppRecord>, order: SortOrder) -> Self {
        Self {
            rows: sort_for_display(apps, order),
        }
    }

    pub fn rows(&self) -> &[AppRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AppRecord> {
        self.rows.get(index)
    }

    /// Launch the row at `index`. Returns the launched record, or `None` for an
    /// out-of-range index (in which case nothing is launched).
    pub fn activate(&self, index: usize, registry: &dyn AppRegistry) -> Option<&AppRecord> {
        let app = self.rows.get(index)?;
        registry.launch(&app.identifier);
        Some(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Icon, IconPixels};
    use crate::registry::fake::FakeRegistry;

    fn folded(name: &str) -> (String, &str) {
        (name.to_lowercase(), name)
    }

    fn names(list: &AppList) -> Vec<&str> {
        list.rows().iter().map(|a| a.display_name.as_str()).collect()
    }

    fn icon() -> Icon {
        Icon {
            path: "/usr/share/pixmaps/zeta.png".into(),
            pixels: IconPixels {
                width: 1,
                height: 1,
                rgba: vec![10, 20, 30, 255],
            },
        }
    }

    #[test]
    fn scenario_zeta_alpha() {
        let apps = vec![
            AppRecord::new("Zeta", "pkg.z").with_icon(icon()),
            AppRecord::new("Alpha", "pkg.a"),
        ];
        let registry = FakeRegistry::with_apps(apps);
        let list = AppList::new(registry.list_launchable(), SortOrder::default());

        assert_eq!(names(&list), vec!["Alpha", "Zeta"]);
        assert!(list.get(0).unwrap().icon.is_none());
        assert!(list.get(1).unwrap().icon.is_some());

        let launched = list.activate(0, &registry).map(|a| a.identifier.clone());
        assert_eq!(launched.as_deref(), Some("pkg.a"));
        assert_eq!(registry.launched(), vec!["pkg.a"]);
    }

    #[test]
    fn activation_launches_exactly_once_per_selection() {
        let registry = FakeRegistry::default();
        let list = AppList::new(
            vec![AppRecord::new("B", "pkg.b"), AppRecord::new("A", "pkg.a")],
            SortOrder::default(),
        );
        list.activate(1, &registry);
        assert_eq!(registry.launched(), vec!["pkg.b"]);
        list.activate(0, &registry);
        assert_eq!(registry.launched(), vec!["pkg.b", "pkg.a"]);
    }

    #[test]
    fn out_of_range_activation_launches_nothing() {
        let registry = FakeRegistry::default();
        let list = AppList::new(vec![AppRecord::new("A", "pkg.a")], SortOrder::default());
        assert!(list.activate(5, &registry).is_none());
        assert!(AppList::default().activate(0, &registry).is_none());
        assert!(registry.launched().is_empty());
    }

    #[test]
    fn duplicate_names_are_all_kept() {
        let list = AppList::new(
            vec![
                AppRecord::new("Terminal", "pkg.one"),
                AppRecord::new("Files", "pkg.files"),
                AppRecord::new("Terminal", "pkg.two"),
            ],
            SortOrder::default(),
        );
        assert_eq!(names(&list), vec!["Files", "Terminal", "Terminal"]);
        let ids: Vec<&str> = list.rows().iter().map(|a| a.identifier.as_str()).collect();
        // Stable sort keeps discovery order for equal names.
        assert_eq!(ids, vec!["pkg.files", "pkg.one", "pkg.two"]);
    }

    #[test]
    fn order_is_non_decreasing_for_every_permutation() {
        let base = ["delta", "Alpha", "charlie", "Bravo", "alpha", "Écho"];
        // Rotations and reversals give a spread of input orders.
        for shift in 0..base.len() {
            for reverse in [false, true] {
                let mut input: Vec<&str> = base.to_vec();
                input.rotate_left(shift);
                if reverse {
                    input.reverse();
                }
                let apps = input
                    .iter()
                    .enumerate()
                    .map(|(i, n)| AppRecord::new(*n, format!("pkg.{i}")))
                    .collect();
                let sorted = sort_for_display(apps, SortOrder::CaseInsensitive);
                for pair in sorted.windows(2) {
                    assert!(folded(&pair[0].display_name) <= folded(&pair[1].display_name));
                }
                let again = sort_for_display(sorted.clone(), SortOrder::CaseInsensitive);
                assert_eq!(again, sorted);
            }
        }
    }

    #[test]
    fn equal_names_keep_discovery_order_in_both_orders() {
        let apps = vec![
            AppRecord::new("Mail", "pkg.first"),
            AppRecord::new("Calc", "pkg.calc"),
            AppRecord::new("Mail", "pkg.second"),
            AppRecord::new("Mail", "pkg.third"),
        ];
        for order in [SortOrder::CaseInsensitive, SortOrder::CaseSensitive] {
            let sorted = sort_for_display(apps.clone(), order);
            let ids: Vec<&str> = sorted.iter().map(|a| a.identifier.as_str()).collect();
            assert_eq!(ids, vec!["pkg.calc", "pkg.first", "pkg.second", "pkg.third"]);
        }
    }

    #[test]
    fn case_handling_per_sort_order() {
        let apps = vec![
            AppRecord::new("beta", "b"),
            AppRecord::new("Alpha", "A"),
            AppRecord::new("alpha", "a"),
        ];
        let insensitive = AppList::new(apps.clone(), SortOrder::CaseInsensitive);
        assert_eq!(names(&insensitive), vec!["Alpha", "alpha", "beta"]);

        let sensitive = AppList::new(apps, SortOrder::CaseSensitive);
        assert_eq!(names(&sensitive), vec!["Alpha", "alpha", "beta"]);

        let upper_last = AppList::new(
            vec![AppRecord::new("zed", "z"), AppRecord::new("Zed", "Z")],
            SortOrder::CaseSensitive,
        );
        assert_eq!(names(&upper_last), vec!["Zed", "zed"]);
    }

    #[test]
    fn desaturate_keeps_grays_and_extremes() {
        assert_eq!(desaturate(255, 255, 255), 255);
        assert_eq!(desaturate(0, 0, 0), 0);
        assert_eq!(desaturate(128, 128, 128), 128);
        // Green dominates perceived brightness.
        assert!(desaturate(0, 255, 0) > desaturate(255, 0, 0));
        assert!(desaturate(255, 0, 0) > desaturate(0, 0, 255));
    }
}
