//! Embedding vector math

/// Calculate cosine similarity between two vectors
///
/// Returns 0.0 for mismatched lengths or zero-norm inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Clamp a raw cosine similarity into a [0, 1] score.
///
/// Matching scores are exposed to callers in [0, 1]; anti-correlated
/// vectors score zero rather than negative.
pub fn similarity_score(raw: f32) -> f32 {
    raw.clamp(0.0, 1.0)
}
