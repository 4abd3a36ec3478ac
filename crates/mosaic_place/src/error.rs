//! Error types for placement runs.

/// The standard result type for placement operations.
pub type PlaceResult<T> = Result<T, PlaceError>;

/// A fatal placement error; no partial placement is emitted.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// A macro's template has no conflict-free placement anywhere on the
    /// device during model construction. Raised before annealing starts.
    #[error("no legal initial placement for macro '{name}'")]
    Configuration {
        /// Name of the macro that could not be placed.
        name: String,
    },

    /// Final legalization could not find any conflict-free site for a macro,
    /// after both the spiral search and the device-wide fallback.
    #[error("no conflict-free site for macro '{name}' during legalization")]
    Legalization {
        /// Name of the macro that could not be legalized.
        name: String,
    },

    /// The recomputed system cost after undoing a rejected move does not
    /// match the pre-move cost. This indicates corruption of the incremental
    /// cost model and invalidates every optimization decision after it.
    #[error("system cost {actual} after undo, expected {expected}")]
    Consistency {
        /// The pre-move cost that should have been restored.
        expected: u64,
        /// The cost actually observed after the undo.
        actual: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_configuration() {
        let err = PlaceError::Configuration {
            name: "fir_core".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "no legal initial placement for macro 'fir_core'"
        );
    }

    #[test]
    fn display_legalization() {
        let err = PlaceError::Legalization {
            name: "dma_0".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "no conflict-free site for macro 'dma_0' during legalization"
        );
    }

    #[test]
    fn display_consistency() {
        let err = PlaceError::Consistency {
            expected: 120,
            actual: 124,
        };
        assert_eq!(format!("{err}"), "system cost 124 after undo, expected 120");
    }

    #[test]
    fn result_alias() {
        let ok: PlaceResult<u32> = Ok(5);
        assert!(ok.is_ok());
        let err: PlaceResult<u32> = Err(PlaceError::Configuration {
            name: "x".to_string(),
        });
        assert!(err.is_err());
    }
}
