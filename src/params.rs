//! Benchmark parameter grids
//!
//! ASV stores a parameterized benchmark's timings as one flat array per
//! revision, ordered by the row-major Cartesian product of its parameter
//! value lists. Expanding the grid in that same order lets a raw timing
//! array zip positionally with its parameter combinations.

/// One resolved parameter combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameters {
    names: Vec<String>,
    values: Vec<String>,
}

impl Parameters {
    pub fn new(names: Vec<String>, values: Vec<String>) -> Self {
        Self { names, values }
    }

    /// Deterministic series signature, e.g. `"x=0.001; y=foo"`.
    /// Empty for a parameterless benchmark.
    pub fn param_string(&self) -> String {
        make_param_string(&self.names, &self.values)
    }
}

/// Every combination of a benchmark's parameter grid, in storage order
#[derive(Debug, Clone)]
pub struct ParameterCollection {
    combos: Vec<Parameters>,
}

impl ParameterCollection {
    /// Expand `names` x `values` into the row-major Cartesian product.
    /// The last axis varies fastest. A benchmark with no parameters
    /// expands to a single empty combination.
    pub fn new(names: &[String], values: &[Vec<String>]) -> Self {
        let mut partial: Vec<Vec<String>> = vec![Vec::new()];
        for axis in values {
            let mut next = Vec::with_capacity(partial.len() * axis.len());
            for combo in &partial {
                for value in axis {
                    let mut extended = combo.clone();
                    extended.push(value.clone());
                    next.push(extended);
                }
            }
            partial = next;
        }

        let combos = partial
            .into_iter()
            .map(|values| Parameters::new(names.to_vec(), values))
            .collect();
        Self { combos }
    }

    pub fn combos(&self) -> &[Parameters] {
        &self.combos
    }

    pub fn len(&self) -> usize {
        self.combos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }
}

/// Join parameter names with their resolved values in declaration order
pub fn make_param_string(names: &[String], values: &[String]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parameterless_benchmark_yields_one_empty_combo() {
        let grid = ParameterCollection::new(&[], &[]);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.combos()[0].param_string(), "");
    }

    #[test]
    fn test_single_axis() {
        let grid = ParameterCollection::new(&strings(&["x"]), &[strings(&["0.001", "0.002"])]);
        let signatures: Vec<String> = grid.combos().iter().map(|c| c.param_string()).collect();
        assert_eq!(signatures, vec!["x=0.001", "x=0.002"]);
    }

    #[test]
    fn test_product_is_row_major() {
        let grid = ParameterCollection::new(
            &strings(&["a", "b"]),
            &[strings(&["1", "2"]), strings(&["x", "y"])],
        );
        let signatures: Vec<String> = grid.combos().iter().map(|c| c.param_string()).collect();
        // Last axis varies fastest.
        assert_eq!(signatures, vec!["a=1; b=x", "a=1; b=y", "a=2; b=x", "a=2; b=y"]);
    }

    #[test]
    fn test_empty_axis_yields_no_combos() {
        let grid = ParameterCollection::new(&strings(&["a"]), &[Vec::new()]);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_make_param_string() {
        assert_eq!(
            make_param_string(&strings(&["a", "b"]), &strings(&["1", "2"])),
            "a=1; b=2"
        );
        assert_eq!(make_param_string(&[], &[]), "");
    }
}
