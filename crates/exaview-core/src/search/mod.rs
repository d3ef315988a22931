// ── Nested search engine ──
//
// Filters racks by a fixed field set on the rack and, per category, on its
// components and their nested VMs / cell disks. Alongside the kept records
// it returns the expansion set: for every nested item that matched, the
// owning host's hostname is recorded once under that rack and category.

pub mod fields;
pub mod fold;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{Component, Rack, RackView};
use crate::normalize::normalize;
pub use fields::Category;
use fields::Nested;
pub use fold::{Needle, fold};

/// Hostnames whose nested rows should be auto-expanded, per category.
///
/// A hostname appears once per matching nested item, so it may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpenRows {
    pub kvm: Vec<String>,
    pub dom0: Vec<String>,
    pub storage_cell: Vec<String>,
}

impl OpenRows {
    pub fn is_empty(&self) -> bool {
        self.kvm.is_empty() && self.dom0.is_empty() && self.storage_cell.is_empty()
    }

    /// `true` if `hostname` should be expanded in `category`.
    pub fn contains(&self, category: Category, hostname: &str) -> bool {
        self.rows(category)
            .is_some_and(|rows| rows.iter().any(|h| h == hostname))
    }

    fn rows(&self, category: Category) -> Option<&Vec<String>> {
        match category {
            Category::Kvm => Some(&self.kvm),
            Category::Dom0 => Some(&self.dom0),
            Category::StorageCell => Some(&self.storage_cell),
            Category::BareMetal | Category::IbSwitch => None,
        }
    }

    fn rows_mut(&mut self, category: Category) -> Option<&mut Vec<String>> {
        match category {
            Category::Kvm => Some(&mut self.kvm),
            Category::Dom0 => Some(&mut self.dom0),
            Category::StorageCell => Some(&mut self.storage_cell),
            Category::BareMetal | Category::IbSwitch => None,
        }
    }
}

/// Result of one search pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// Kept records, in input order.
    pub records: Vec<RackView>,
    /// Expansion set keyed by rack ID, one entry per kept record.
    pub open_rows: IndexMap<String, OpenRows>,
}

impl SearchOutcome {
    pub fn open_rows_for(&self, rack_id: &str) -> Option<&OpenRows> {
        self.open_rows.get(rack_id)
    }
}

/// Normalize `racks` and keep those matching `term`.
///
/// An empty term keeps everything and expands nothing. Otherwise a rack is
/// kept when its ID, display name or machine-type label contains the term,
/// or when any category has at least one matching component. All
/// categories are always scanned so the expansion set is complete.
pub fn search<'a, I>(racks: I, term: &str) -> SearchOutcome
where
    I: IntoIterator<Item = &'a Rack>,
{
    let views = racks.into_iter().map(normalize);

    if term.is_empty() {
        let mut outcome = SearchOutcome::default();
        for view in views {
            outcome
                .open_rows
                .insert(view.rack_id.clone(), OpenRows::default());
            outcome.records.push(view);
        }
        return outcome;
    }

    let needle = Needle::new(term);
    let mut outcome = SearchOutcome::default();

    for view in views {
        let mut rows = OpenRows::default();
        let machine_type = view.machine_type.to_string();

        let direct = needle.matches(Some(view.rack_id.as_str()))
            || needle.matches(Some(view.hostname.as_str()))
            || needle.matches(Some(machine_type.as_str()));

        let mut category_hits = 0usize;
        for category in Category::ALL {
            category_hits += scan_category(category, category.members(&view), &needle, &mut rows);
        }

        if direct || category_hits > 0 {
            outcome.open_rows.insert(view.rack_id.clone(), rows);
            outcome.records.push(view);
        }
    }

    outcome
}

/// Count matching components, recording nested-item matches in `rows`.
fn scan_category(
    category: Category,
    components: &[Component],
    needle: &Needle,
    rows: &mut OpenRows,
) -> usize {
    let mut hits = 0;

    for component in components {
        let nested_hits = scan_nested(category.nested(), component, needle);
        if let Some(open) = rows.rows_mut(category) {
            open.extend(std::iter::repeat_n(component.hostname.clone(), nested_hits));
        }

        let own = category
            .fields()
            .iter()
            .any(|f| needle.matches(f.value(component).as_deref()));

        if own || nested_hits > 0 {
            hits += 1;
        }
    }

    hits
}

fn scan_nested(nested: Nested, component: &Component, needle: &Needle) -> usize {
    match nested {
        Nested::None => 0,
        Nested::Vms(fields) => component
            .vms
            .iter()
            .filter(|vm| fields.iter().any(|f| needle.matches(f.value(vm).as_deref())))
            .count(),
        Nested::Cells(fields) => component
            .cell_disks
            .iter()
            .filter(|cell| {
                fields
                    .iter()
                    .any(|f| needle.matches(f.value(cell).as_deref()))
            })
            .count(),
    }
}
