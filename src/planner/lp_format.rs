use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::planner::constants::{OBJECTIVE_NAME, VARIABLE_PREFIX};
use crate::solver::{LinearProgram, VariableDomain};

impl LinearProgram {
    /// Render the program in CPLEX LP text format.
    pub fn to_lp_format(&self) -> String {
        let names = lp_variable_names(&self.variables);
        let mut out = String::new();

        let _ = writeln!(out, "\\* {} *\\", self.name);
        let _ = writeln!(out, "Minimize");
        let _ = writeln!(out, "{}: {}", OBJECTIVE_NAME, linear_expression(&self.objective, &names));

        let _ = writeln!(out, "Subject To");
        for row in &self.constraints {
            let _ = writeln!(
                out,
                "{}: {} {} {}",
                row.name,
                linear_expression(&row.coefficients, &names),
                row.sense.symbol(),
                row.rhs
            );
        }

        if self.domain == VariableDomain::Integer && !names.is_empty() {
            let _ = writeln!(out, "Generals");
            for name in &names {
                let _ = writeln!(out, "{}", name);
            }
        }

        let _ = writeln!(out, "End");
        out
    }

    /// Write the LP text to `path` for inspection with other tools.
    pub fn write_lp<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_lp_format())?;
        Ok(())
    }
}

/// LP identifiers may not contain spaces or most punctuation.
fn lp_variable_name(food: &str) -> String {
    let body: String = food
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("{}{}", VARIABLE_PREFIX, body)
}

/// Sanitized names, with the variable index appended where two foods would
/// otherwise share one.
fn lp_variable_names(variables: &[String]) -> Vec<String> {
    let mut used = HashSet::with_capacity(variables.len());
    variables
        .iter()
        .enumerate()
        .map(|(i, food)| {
            let mut name = lp_variable_name(food);
            while used.contains(&name) {
                name = format!("{}_{}", name, i);
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

fn linear_expression(coefficients: &[f64], names: &[String]) -> String {
    let mut terms = String::new();
    for (coef, name) in coefficients.iter().zip(names) {
        if *coef == 0.0 {
            continue;
        }
        let sign = if *coef < 0.0 { "-" } else { "+" };
        if terms.is_empty() {
            if *coef < 0.0 {
                terms.push_str("- ");
            }
        } else {
            let _ = write!(terms, " {} ", sign);
        }
        let _ = write!(terms, "{} {}", coef.abs(), name);
    }

    if terms.is_empty() {
        // Every coefficient is zero; LP readers still want a term.
        match names.first() {
            Some(name) => format!("0 {}", name),
            None => "0".to_string(),
        }
    } else {
        terms
    }
}
