//! Lineage validation for horse create and update requests
//!
//! Two failure lists are built independently: structural errors on the
//! record's own fields and conflict errors that need the parents or the rest
//! of the herd. Every check runs before a verdict is produced, so a caller
//! receives the complete set of failures. Conflicts take precedence over
//! structural errors when both are present.

use crate::error::{Error, Result};
use crate::horse::{Horse, HorseDraft, Sex};
use crate::limits::{earliest_birth_date, MAX_DESCRIPTION_LEN, MAX_HORSE_NAME_LEN};
use chrono::{Local, NaiveDate};

/// Whether a draft is about to be created or is replacing a stored horse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// What the validator may consult besides the draft itself
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub mode: ValidationMode,
    /// Every stored horse; consulted for the parent sex lock on update
    pub existing: &'a [Horse],
}

impl<'a> ValidationContext<'a> {
    pub fn create() -> Self {
        Self {
            mode: ValidationMode::Create,
            existing: &[],
        }
    }

    pub fn update(existing: &'a [Horse]) -> Self {
        Self {
            mode: ValidationMode::Update,
            existing,
        }
    }
}

/// Accumulated failures of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub structural: Vec<String>,
    pub conflicts: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structural(&mut self, message: impl Into<String>) {
        self.structural.push(message.into());
    }

    pub fn conflict(&mut self, message: impl Into<String>) {
        self.conflicts.push(message.into());
    }

    pub fn is_clean(&self) -> bool {
        self.structural.is_empty() && self.conflicts.is_empty()
    }

    /// Collapse into a single verdict; conflicts win over structural errors
    pub fn into_result(self, summary: &str) -> Result<()> {
        if !self.conflicts.is_empty() {
            Err(Error::conflict(summary, self.conflicts))
        } else if !self.structural.is_empty() {
            Err(Error::validation(summary, self.structural))
        } else {
            Ok(())
        }
    }
}

/// Checks horse drafts against field rules and lineage invariants
#[derive(Debug, Clone, Copy)]
pub struct LineageValidator {
    today: NaiveDate,
}

impl Default for LineageValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl LineageValidator {
    /// Validator that judges dates against the local calendar date
    pub fn new() -> Self {
        Self::at(Local::now().date_naive())
    }

    /// Validator with a fixed notion of "today"
    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn validate_for_create(&self, draft: &HorseDraft) -> Result<()> {
        self.validate(draft, &ValidationContext::create())
    }

    pub fn validate_for_update(&self, draft: &HorseDraft, existing: &[Horse]) -> Result<()> {
        self.validate(draft, &ValidationContext::update(existing))
    }

    pub fn validate(&self, draft: &HorseDraft, ctx: &ValidationContext<'_>) -> Result<()> {
        tracing::trace!("validate({:?}, mode={:?})", draft, ctx.mode);

        let report = self.report(draft, ctx);
        let summary = match ctx.mode {
            ValidationMode::Create => "Validation of horse to create failed",
            ValidationMode::Update => "Validation of horse for update failed",
        };

        if !report.is_clean() {
            tracing::debug!(
                "Horse draft rejected: {} structural, {} conflict errors",
                report.structural.len(),
                report.conflicts.len()
            );
        }
        report.into_result(summary)
    }

    /// Run every check and return the raw report without a verdict
    pub fn report(&self, draft: &HorseDraft, ctx: &ValidationContext<'_>) -> ValidationReport {
        let mut report = ValidationReport::new();

        if ctx.mode == ValidationMode::Update && draft.id.is_none() {
            report.structural("No ID given");
        }

        self.check_name(draft, &mut report);
        self.check_description(draft, &mut report);
        self.check_date_of_birth(draft, &mut report);
        let sex = self.check_sex(draft, &mut report);

        if ctx.mode == ValidationMode::Update {
            if let (Some(id), Some(sex)) = (draft.id, sex) {
                for child in ctx.existing {
                    let mothered = child.mother_id == Some(id) && sex != Sex::Female;
                    let fathered = child.father_id == Some(id) && sex != Sex::Male;
                    if mothered || fathered {
                        report.conflict(format!(
                            "Horse is already a parent of {} (id {}). Cannot change sex",
                            child.name, child.id
                        ));
                    }
                }
            }
        }

        if let Some(mother) = &draft.mother {
            if Self::parent_not_older(mother, draft.date_of_birth) {
                report.conflict("Horse mother cannot be younger than the horse itself");
            }
            if mother.sex != Sex::Female {
                report.conflict("Mother has to be female");
            }
        }
        if let Some(father) = &draft.father {
            if Self::parent_not_older(father, draft.date_of_birth) {
                report.conflict("Horse father cannot be younger than the horse itself");
            }
            if father.sex != Sex::Male {
                report.conflict("Father has to be male");
            }
        }

        report
    }

    fn check_name(&self, draft: &HorseDraft, report: &mut ValidationReport) {
        match draft.name.as_deref() {
            None => report.structural("Horse name cannot be empty"),
            Some(name) if name.trim().is_empty() => report.structural("Horse name cannot be empty"),
            Some(name) if name.chars().count() > MAX_HORSE_NAME_LEN => report.structural(format!(
                "Horse name must be shorter than {} characters",
                MAX_HORSE_NAME_LEN
            )),
            Some(_) => {}
        }
    }

    fn check_description(&self, draft: &HorseDraft, report: &mut ValidationReport) {
        if let Some(description) = draft.description.as_deref() {
            if description.trim().is_empty() {
                report.structural("Horse description is given but blank");
            }
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                report.structural(format!(
                    "Horse description too long: longer than {} characters",
                    MAX_DESCRIPTION_LEN
                ));
            }
        }
    }

    fn check_date_of_birth(&self, draft: &HorseDraft, report: &mut ValidationReport) {
        match draft.date_of_birth {
            None => report.structural("Horse date of birth cannot be empty"),
            Some(dob) if dob > self.today => {
                report.structural("Horse date of birth cannot be in the future")
            }
            Some(dob) if dob < earliest_birth_date(self.today) => {
                report.structural("Horse cannot be older than 100 years")
            }
            Some(_) => {}
        }
    }

    fn check_sex(&self, draft: &HorseDraft, report: &mut ValidationReport) -> Option<Sex> {
        match draft.sex.as_deref() {
            None => {
                report.structural("Horse sex cannot be empty");
                None
            }
            Some(raw) if raw.trim().is_empty() => {
                report.structural("Horse sex cannot be empty");
                None
            }
            Some(raw) => match raw.parse::<Sex>() {
                Ok(sex) => Some(sex),
                Err(_) => {
                    report.structural("Horse sex should be either MALE or FEMALE");
                    None
                }
            },
        }
    }

    // Unknown child birth date: the ordering cannot be judged, so it passes.
    fn parent_not_older(parent: &Horse, child_dob: Option<NaiveDate>) -> bool {
        child_dob.is_some_and(|dob| parent.date_of_birth >= dob)
    }
}
