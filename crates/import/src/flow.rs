use serde::{Deserialize, Serialize};
use tessera_core::{ColumnMapping, DateOrder, FileAnalysis, MappingError};
use thiserror::Error;

use crate::analyze::Analyzer;

/// Stage of an upload on its way to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Uploaded,
    Analyzed,
    UserConfirmDialect,
    MappingReview,
    Valid,
    Invalid,
}

impl std::fmt::Display for FlowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowState::Uploaded => write!(f, "uploaded"),
            FlowState::Analyzed => write!(f, "analyzed"),
            FlowState::UserConfirmDialect => write!(f, "user_confirm_dialect"),
            FlowState::MappingReview => write!(f, "mapping_review"),
            FlowState::Valid => write!(f, "valid"),
            FlowState::Invalid => write!(f, "invalid"),
        }
    }
}

impl std::str::FromStr for FlowState {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploaded" => Ok(FlowState::Uploaded),
            "analyzed" => Ok(FlowState::Analyzed),
            "user_confirm_dialect" => Ok(FlowState::UserConfirmDialect),
            "mapping_review" => Ok(FlowState::MappingReview),
            "valid" => Ok(FlowState::Valid),
            "invalid" => Ok(FlowState::Invalid),
            other => Err(format!("Unknown flow state: '{other}'")),
        }
    }
}

impl FlowState {
    fn is_reviewing(self) -> bool {
        matches!(
            self,
            FlowState::MappingReview | FlowState::Valid | FlowState::Invalid
        )
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        from: FlowState,
        action: &'static str,
    },
    #[error("Mapping is not valid: {0}")]
    InvalidMapping(#[from] MappingError),
}

/// Drives one file from upload to an accepted [`ColumnMapping`].
///
/// `Uploaded → Analyzed → (UserConfirmDialect →) MappingReview → Valid | Invalid`.
/// The dialect confirmation step is only entered when the probed confidence
/// is below the analyzer's threshold. Every edit made during review is
/// validated again straight away.
#[derive(Debug, Clone)]
pub struct ReviewFlow {
    state: FlowState,
    analysis: Option<FileAnalysis>,
    mapping: Option<ColumnMapping>,
    low_confidence_threshold: f32,
    last_error: Option<MappingError>,
}

impl Default for ReviewFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Uploaded,
            analysis: None,
            mapping: None,
            low_confidence_threshold: 0.7,
            last_error: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn analysis(&self) -> Option<&FileAnalysis> {
        self.analysis.as_ref()
    }

    pub fn mapping(&self) -> Option<&ColumnMapping> {
        self.mapping.as_ref()
    }

    /// Why the mapping is currently invalid, if it is.
    pub fn last_error(&self) -> Option<&MappingError> {
        self.last_error.as_ref()
    }

    pub fn analyze(&mut self, analyzer: &Analyzer, text: &str) -> Result<&FileAnalysis, FlowError> {
        self.require(&[FlowState::Uploaded], "analyze")?;
        self.low_confidence_threshold = analyzer.config().low_confidence_threshold;
        Ok(self.load(analyzer.analyze(text)))
    }

    /// Starts from an analysis produced elsewhere, e.g. a cached one.
    pub fn load_analysis(
        &mut self,
        analysis: FileAnalysis,
        low_confidence_threshold: f32,
    ) -> Result<&FileAnalysis, FlowError> {
        self.require(&[FlowState::Uploaded], "load an analysis")?;
        self.low_confidence_threshold = low_confidence_threshold;
        Ok(self.load(analysis))
    }

    fn load(&mut self, analysis: FileAnalysis) -> &FileAnalysis {
        self.mapping = Some(ColumnMapping::from_analysis(&analysis));
        self.state = FlowState::Analyzed;
        self.analysis.insert(analysis)
    }

    /// Leaves `Analyzed`, detouring through dialect confirmation when the
    /// probe was not confident enough. Otherwise the suggested mapping is
    /// validated straight away.
    pub fn proceed(&mut self) -> Result<FlowState, FlowError> {
        self.require(&[FlowState::Analyzed], "proceed")?;
        let low = self
            .analysis
            .as_ref()
            .is_some_and(|a| a.probed_dialect.is_low_confidence(self.low_confidence_threshold));

        if low {
            tracing::info!("dialect confidence below threshold, asking for confirmation");
            self.state = FlowState::UserConfirmDialect;
            return Ok(self.state);
        }
        self.state = FlowState::MappingReview;
        self.revalidate("proceed")
    }

    pub fn confirm_dialect(
        &mut self,
        is_european_format: bool,
        date_format: DateOrder,
    ) -> Result<FlowState, FlowError> {
        self.require(&[FlowState::UserConfirmDialect], "confirm the dialect")?;
        if let Some(mapping) = self.mapping.as_mut() {
            mapping.is_european_format = is_european_format;
            mapping.date_format = date_format;
        }
        self.state = FlowState::MappingReview;
        self.revalidate("confirm the dialect")
    }

    /// Validates the current mapping, moving to `Valid` or `Invalid`.
    pub fn validate(&mut self) -> Result<FlowState, FlowError> {
        self.require_reviewing("validate")?;
        self.revalidate("validate")
    }

    /// Applies an edit to the mapping and validates the result.
    pub fn edit_mapping<F>(&mut self, edit: F) -> Result<FlowState, FlowError>
    where
        F: FnOnce(&mut ColumnMapping),
    {
        self.require_reviewing("edit the mapping")?;
        if let Some(mapping) = self.mapping.as_mut() {
            edit(mapping);
        }
        self.revalidate("edit the mapping")
    }

    /// Flips between signed-amount and debit/credit layouts.
    pub fn toggle_double_entry(&mut self) -> Result<FlowState, FlowError> {
        self.edit_mapping(|m| {
            let double = !m.is_double_entry();
            m.set_double_entry(double);
        })
    }

    /// Hands out the mapping once it passes validation.
    pub fn accept(&mut self) -> Result<ColumnMapping, FlowError> {
        self.require_reviewing("accept the mapping")?;
        self.revalidate("accept the mapping")?;
        match (&self.last_error, &self.mapping) {
            (Some(err), _) => Err(FlowError::InvalidMapping(err.clone())),
            (None, Some(mapping)) => Ok(mapping.clone()),
            (None, None) => Err(FlowError::InvalidTransition {
                from: self.state,
                action: "accept the mapping",
            }),
        }
    }

    /// Drops the analysis and mapping and starts over.
    pub fn cancel(&mut self) {
        *self = Self {
            low_confidence_threshold: self.low_confidence_threshold,
            ..Self::new()
        };
    }

    /// Moves to `Valid` or `Invalid`. Only a flow that lost its mapping
    /// outside of review can fail here.
    fn revalidate(&mut self, action: &'static str) -> Result<FlowState, FlowError> {
        let (Some(analysis), Some(mapping)) = (&self.analysis, &self.mapping) else {
            return Err(FlowError::InvalidTransition {
                from: self.state,
                action,
            });
        };
        match mapping.validate_for(analysis.headers.len()) {
            Ok(()) => {
                self.last_error = None;
                self.state = FlowState::Valid;
            }
            Err(e) => {
                tracing::debug!("mapping invalid: {e}");
                self.last_error = Some(e);
                self.state = FlowState::Invalid;
            }
        }
        Ok(self.state)
    }

    fn require(&self, allowed: &[FlowState], action: &'static str) -> Result<(), FlowError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    fn require_reviewing(&self, action: &'static str) -> Result<(), FlowError> {
        if self.state.is_reviewing() {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }
}
