//! # Exposure Report
//!
//! The result of one audit run, grouped by resource kind in presentation order.
//!
//! Each [`KindReport`] keeps failures next to findings, so that "nothing is exposed"
//! ([`KindStatus::NoExposure`]) can only be reported when every resource of the kind
//! was actually evaluated.

use exposr_common::error::InventoryError;
use exposr_common::finding::{Finding, ResourceFailure};
use exposr_common::firewall::MalformedSource;
use exposr_common::resource::{ResourceIdentity, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindStatus {
    /// At least one finding.
    Exposed,
    /// Every reachable resource was evaluated and none is exposed.
    NoExposure,
    /// No finding, but some resources could not be evaluated.
    Indeterminate,
    /// The inventory for this kind could not be fetched.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindReport {
    pub kind: ResourceKind,
    /// Reachable resources that went through correlation.
    pub resources: Vec<ResourceIdentity>,
    /// Resources dropped by their reachability gate.
    pub excluded: usize,
    pub findings: Vec<Finding>,
    pub failures: Vec<ResourceFailure>,
    pub malformed: Vec<MalformedSource>,
    pub inventory_error: Option<InventoryError>,
    /// Set when the run deadline cut the inventory or correlation short.
    pub partial: bool,
}

impl KindReport {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            resources: Vec::new(),
            excluded: 0,
            findings: Vec::new(),
            failures: Vec::new(),
            malformed: Vec::new(),
            inventory_error: None,
            partial: false,
        }
    }

    pub fn unavailable(error: InventoryError) -> Self {
        let mut report = Self::new(error.kind());
        report.partial = matches!(error, InventoryError::TimedOut { .. });
        report.inventory_error = Some(error);
        report
    }

    pub fn status(&self) -> KindStatus {
        if self.inventory_error.is_some() {
            KindStatus::Unavailable
        } else if !self.findings.is_empty() {
            KindStatus::Exposed
        } else if !self.failures.is_empty() {
            KindStatus::Indeterminate
        } else {
            KindStatus::NoExposure
        }
    }

    /// `true` when every reachable resource of this kind was evaluated.
    pub fn is_complete(&self) -> bool {
        self.inventory_error.is_none() && self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExposureReport {
    pub sections: Vec<KindReport>,
}

impl ExposureReport {
    pub fn section(&self, kind: ResourceKind) -> Option<&KindReport> {
        self.sections.iter().find(|section| section.kind == kind)
    }

    /// Findings of one kind. Empty when the kind is missing or unavailable.
    pub fn findings(&self, kind: ResourceKind) -> &[Finding] {
        self.section(kind)
            .map(|section| section.findings.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_findings(&self) -> usize {
        self.sections.iter().map(|section| section.findings.len()).sum()
    }

    pub fn total_resources(&self) -> usize {
        self.sections.iter().map(|section| section.resources.len()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ResourceFailure> {
        self.sections.iter().flat_map(|section| section.failures.iter())
    }

    pub fn is_complete(&self) -> bool {
        self.sections.iter().all(KindReport::is_complete)
    }

    pub fn is_partial(&self) -> bool {
        self.sections.iter().any(|section| section.partial)
    }
}
