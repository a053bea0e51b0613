use eca_automaton::{Neighborhood, RuleTable};

use crate::error::PredictionResult;

/// Something that guesses a cell's next value from its neighborhood and the
/// rule written out as a lookup table.
///
/// Calls block until exactly one answer or failure is available. There is no
/// retry: a failed call is reported once and the caller decides what to do.
pub trait NextStatePredictor: Send + Sync {
    /// Short label used in logs and reports.
    fn name(&self) -> &str;

    /// Predict the next value of the cell at the center of `neighborhood`.
    fn predict(&self, neighborhood: Neighborhood, rules: &RuleTable) -> PredictionResult<u8>;

    /// Predict the whole next row.
    ///
    /// The default issues one [`predict`](Self::predict) per cell, strictly in
    /// index order, and fails on the first failed cell. Predictors that can
    /// answer for a row in a single request override this.
    fn predict_row(&self, row: &[u8], rules: &RuleTable) -> PredictionResult<Vec<u8>> {
        (0..row.len())
            .map(|i| self.predict(Neighborhood::of(row, i), rules))
            .collect()
    }
}

/// Predictor that answers straight from the rule table.
///
/// Serves as the baseline a model is measured against, and as a stand-in
/// when no endpoint is available.
#[derive(Debug, Default, Clone)]
pub struct TableLookupPredictor;

impl NextStatePredictor for TableLookupPredictor {
    fn name(&self) -> &str {
        "table-lookup"
    }

    fn predict(&self, neighborhood: Neighborhood, rules: &RuleTable) -> PredictionResult<u8> {
        Ok(rules.output_for(neighborhood))
    }
}
