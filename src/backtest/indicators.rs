//! Moving-average indicators for the crossover strategy.

/// Moving average at every index of `prices`.
///
/// Until `window` points exist the mean expands over everything seen so
/// far; from then on it slides over the trailing `window` points. The
/// output always has the same length as the input.
pub fn moving_averages(prices: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(prices.len());
    let mut sum = 0.0;

    for (i, price) in prices.iter().enumerate() {
        sum += price;
        if i >= window {
            sum -= prices[i - window];
            out.push(sum / window as f64);
        } else {
            out.push(sum / (i + 1) as f64);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
