// ---------------------------------------------------------------------------
// Co-rating similarity
// ---------------------------------------------------------------------------
//
// Aligns two rating rows on their shared keys and scores them with cosine
// similarity. Used for both user/user and item/item comparisons.
// ---------------------------------------------------------------------------

use crate::cosine::cosine_similarity;
use crate::store::RatingRow;

/// Cosine similarity of two rows restricted to the keys both contain.
/// Returns 0.0 when the rows share no key.
///
/// Shared keys are visited in sorted order so that swapping the arguments
/// produces a bit-identical result.
pub(crate) fn row_similarity(a: &RatingRow, b: &RatingRow) -> f64 {
	let mut shared: Vec<&str> = a.iter().map(|(k, _)| k).filter(|k| b.contains(k)).collect();
	if shared.is_empty() {
		return 0.0;
	}
	shared.sort_unstable();

	let (va, vb): (Vec<f64>, Vec<f64>) = shared
		.iter()
		.filter_map(|k| Some((a.get(k)?, b.get(k)?)))
		.unzip();

	cosine_similarity(&va, &vb)
}
