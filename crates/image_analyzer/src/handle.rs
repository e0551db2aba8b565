use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::{error::Result, traits::Analyzer};

/// Scoped owner of an analyzer. An analyzer still initialized when the
/// handle drops is destroyed.
pub struct AnalyzerHandle {
    analyzer: Box<dyn Analyzer>,
}

impl AnalyzerHandle {
    pub fn new(analyzer: Box<dyn Analyzer>) -> Self {
        Self { analyzer }
    }

    /// Create and initialize in one step
    pub fn initialized(mut analyzer: Box<dyn Analyzer>) -> Result<Self> {
        analyzer.initialize()?;
        Ok(Self::new(analyzer))
    }

    /// Destroy explicitly and surface the result
    pub fn release(mut self) -> Result<()> {
        if self.analyzer.state().is_initialized() {
            self.analyzer.destroy()
        } else {
            Ok(())
        }
    }
}

impl Deref for AnalyzerHandle {
    type Target = dyn Analyzer;

    fn deref(&self) -> &Self::Target {
        self.analyzer.as_ref()
    }
}

impl DerefMut for AnalyzerHandle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.analyzer.as_mut()
    }
}

impl Drop for AnalyzerHandle {
    fn drop(&mut self) {
        if self.analyzer.state().is_initialized() {
            if let Err(e) = self.analyzer.destroy() {
                warn!(analyzer = self.analyzer.name(), "failed to destroy analyzer on drop: {}", e);
            }
        }
    }
}

impl std::fmt::Debug for AnalyzerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerHandle")
            .field("analyzer", &self.analyzer.name())
            .field("state", &self.analyzer.state())
            .finish()
    }
}
