use serde::Serialize;

/// Relation between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl Sense {
    pub fn symbol(&self) -> &'static str {
        match self {
            Sense::LessEqual => "<=",
            Sense::GreaterEqual => ">=",
            Sense::Equal => "=",
        }
    }

    pub fn flipped(&self) -> Sense {
        match self {
            Sense::LessEqual => Sense::GreaterEqual,
            Sense::GreaterEqual => Sense::LessEqual,
            Sense::Equal => Sense::Equal,
        }
    }
}

/// Whether decision variables must take whole values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum VariableDomain {
    #[default]
    Integer,
    Continuous,
}

/// One row: `coefficients · x  sense  rhs`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearConstraint {
    pub name: String,
    pub coefficients: Vec<f64>,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, coefficients: Vec<f64>, sense: Sense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            coefficients,
            sense,
            rhs,
        }
    }

    /// Single-variable row `x[var] sense rhs` over `n` variables.
    pub fn variable_bound(name: impl Into<String>, n: usize, var: usize, sense: Sense, rhs: f64) -> Self {
        let mut coefficients = vec![0.0; n];
        coefficients[var] = 1.0;
        Self::new(name, coefficients, sense, rhs)
    }

    pub fn lhs(&self, x: &[f64]) -> f64 {
        self.coefficients.iter().zip(x).map(|(a, v)| a * v).sum()
    }

    pub fn is_satisfied(&self, x: &[f64], tolerance: f64) -> bool {
        let lhs = self.lhs(x);
        match self.sense {
            Sense::LessEqual => lhs <= self.rhs + tolerance,
            Sense::GreaterEqual => lhs >= self.rhs - tolerance,
            Sense::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Minimize `objective · x` subject to `constraints` and `x >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearProgram {
    pub name: String,
    pub variables: Vec<String>,
    pub objective: Vec<f64>,
    pub constraints: Vec<LinearConstraint>,
    pub domain: VariableDomain,
}

impl LinearProgram {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }

    /// Non-negativity and every row hold for `x`.
    pub fn is_feasible(&self, x: &[f64], tolerance: f64) -> bool {
        x.len() == self.num_variables()
            && x.iter().all(|v| *v >= -tolerance)
            && self.constraints.iter().all(|c| c.is_satisfied(x, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> LinearProgram {
        LinearProgram {
            name: "test".to_string(),
            variables: vec!["a".to_string(), "b".to_string()],
            objective: vec![1.0, 2.0],
            constraints: vec![
                LinearConstraint::new("c1", vec![1.0, 1.0], Sense::GreaterEqual, 2.0),
                LinearConstraint::new("c2", vec![1.0, 0.0], Sense::LessEqual, 1.5),
            ],
            domain: VariableDomain::Integer,
        }
    }

    #[test]
    fn test_objective_value() {
        assert_eq!(program().objective_value(&[1.0, 3.0]), 7.0);
    }

    #[test]
    fn test_is_feasible() {
        let p = program();
        assert!(p.is_feasible(&[1.0, 1.0], 1e-9));
        assert!(!p.is_feasible(&[2.0, 0.0], 1e-9));
        assert!(!p.is_feasible(&[0.0, 1.0], 1e-9));
        assert!(!p.is_feasible(&[-1.0, 5.0], 1e-9));
    }

    #[test]
    fn test_variable_bound_row() {
        let row = LinearConstraint::variable_bound("ub", 3, 1, Sense::LessEqual, 4.0);
        assert_eq!(row.coefficients, vec![0.0, 1.0, 0.0]);
        assert!(row.is_satisfied(&[9.0, 4.0, 9.0], 0.0));
    }

    #[test]
    fn test_sense_flip() {
        assert_eq!(Sense::LessEqual.flipped(), Sense::GreaterEqual);
        assert_eq!(Sense::Equal.flipped(), Sense::Equal);
    }
}
