// ── Searchable field tables ──
//
// Each category of component has a fixed list of searchable fields, and
// three categories also search a nested collection. The tables below are
// the single source of truth for what a term can hit.

use std::borrow::Cow;

use crate::model::{CellDisk, Component, RackView, VirtualMachine};

fn text(value: Option<&String>) -> Option<Cow<'_, str>> {
    value.map(|s| Cow::Borrowed(s.as_str()))
}

fn number(value: Option<i64>) -> Option<Cow<'static, str>> {
    value.map(|n| Cow::Owned(n.to_string()))
}

/// Searchable component field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentField {
    Hostname,
    Model,
    ImageVersion,
    TotalCpu,
    UsedCpu,
    FreeCpu,
    CpuEnabled,
    Memory,
    UsedRam,
    FreeRam,
    Kernel,
    SwVersion,
}

impl ComponentField {
    /// The field's value rendered as text. Numbers are rendered in decimal.
    pub fn value(self, c: &Component) -> Option<Cow<'_, str>> {
        match self {
            Self::Hostname => Some(Cow::Borrowed(c.hostname.as_str())),
            Self::Model => text(c.model.as_ref()),
            Self::ImageVersion => text(c.image_version.as_ref()),
            Self::Kernel => text(c.kernel.as_ref()),
            Self::SwVersion => text(c.sw_version.as_ref()),
            Self::TotalCpu => number(c.total_cpu),
            Self::UsedCpu => number(c.used_cpu),
            Self::FreeCpu => number(c.free_cpu),
            Self::CpuEnabled => number(c.cpu_enabled),
            Self::Memory => number(c.memory),
            Self::UsedRam => number(c.used_ram),
            Self::FreeRam => number(c.free_ram),
        }
    }
}

/// Searchable VM field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmField {
    Name,
    RamCurrent,
    CpuCurrent,
    RamOnline,
    CpuOnline,
}

impl VmField {
    pub fn value(self, vm: &VirtualMachine) -> Option<Cow<'_, str>> {
        match self {
            Self::Name => Some(Cow::Borrowed(vm.name.as_str())),
            Self::RamCurrent => number(vm.ram_current),
            Self::CpuCurrent => number(vm.cpu_current),
            Self::RamOnline => number(vm.ram_online),
            Self::CpuOnline => number(vm.cpu_online),
        }
    }
}

/// Searchable cell-disk field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField {
    Type,
    CellDisk,
    Cell,
    Status,
    Size,
    FreeSpace,
    ErrorCount,
}

impl CellField {
    pub fn value(self, cell: &CellDisk) -> Option<Cow<'_, str>> {
        match self {
            Self::Type => text(cell.disk_type.as_ref()),
            Self::CellDisk => text(cell.cell_disk.as_ref()),
            Self::Cell => text(cell.cell.as_ref()),
            Self::Status => text(cell.status.as_ref()),
            Self::Size => text(cell.size.as_ref()),
            Self::FreeSpace => text(cell.free_space.as_ref()),
            Self::ErrorCount => number(cell.error_count),
        }
    }
}

/// Nested collection searched under a component.
#[derive(Debug, Clone, Copy)]
pub enum Nested {
    None,
    Vms(&'static [VmField]),
    Cells(&'static [CellField]),
}

/// Component category of a rack view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Kvm,
    Dom0,
    BareMetal,
    StorageCell,
    IbSwitch,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Kvm,
        Self::Dom0,
        Self::BareMetal,
        Self::StorageCell,
        Self::IbSwitch,
    ];

    /// Component fields searched for this category.
    pub fn fields(self) -> &'static [ComponentField] {
        use ComponentField as F;
        match self {
            Self::Kvm | Self::Dom0 => &[
                F::Hostname,
                F::Model,
                F::ImageVersion,
                F::TotalCpu,
                F::UsedCpu,
                F::FreeCpu,
                F::Memory,
                F::UsedRam,
                F::FreeRam,
            ],
            Self::BareMetal => &[
                F::Hostname,
                F::Memory,
                F::CpuEnabled,
                F::TotalCpu,
                F::ImageVersion,
                F::Kernel,
            ],
            Self::StorageCell => &[
                F::Hostname,
                F::Model,
                F::ImageVersion,
                F::TotalCpu,
                F::CpuEnabled,
            ],
            Self::IbSwitch => &[F::Hostname, F::Model, F::SwVersion],
        }
    }

    /// Heading used when listing the category.
    pub fn label(self) -> &'static str {
        match self {
            Self::Kvm => "KVM hosts",
            Self::Dom0 => "DOM0 hosts",
            Self::BareMetal => "Bare metal hosts",
            Self::StorageCell => "Storage cells",
            Self::IbSwitch => "IB switches",
        }
    }

    /// Nested collection searched for this category.
    pub fn nested(self) -> Nested {
        match self {
            Self::Kvm => Nested::Vms(&[VmField::Name, VmField::RamCurrent, VmField::CpuCurrent]),
            Self::Dom0 => Nested::Vms(&[VmField::Name, VmField::CpuOnline, VmField::RamOnline]),
            Self::StorageCell => Nested::Cells(&[
                CellField::Type,
                CellField::CellDisk,
                CellField::Cell,
                CellField::Status,
                CellField::Size,
                CellField::FreeSpace,
                CellField::ErrorCount,
            ]),
            Self::BareMetal | Self::IbSwitch => Nested::None,
        }
    }

    /// The view's components in this category.
    pub fn members(self, view: &RackView) -> &[Component] {
        match self {
            Self::Kvm => &view.kvm_hosts,
            Self::Dom0 => &view.dom0_hosts,
            Self::BareMetal => &view.bare_metal_hosts,
            Self::StorageCell => &view.storage_cells,
            Self::IbSwitch => &view.ib_switches,
        }
    }
}
