//! The gadget DSL front-end (§6 / §4.8): turns a line-oriented assignment
//! listing into a populated [`WireTable`]. Architecturally separate from
//! the classifier — it hands back a [`ParsedGadget`] and is never re-entered
//! during verification.

use std::collections::HashMap;

use crate::algebra::{Monomial, Polynomial, VarId};
use crate::constants::{KW_IN, KW_OUT, KW_RANDOMS, KW_SHARES, TOK_AND, TOK_ASSIGN, TOK_XOR};
use crate::error::{Result, VerifierError};
use crate::gadget::variable::VariableTable;
use crate::gadget::wire::WireTable;

/// The wire table plus the circuit-level metadata the driver needs: which
/// wires are probeable, which form each output's shares, and how many
/// secrets/shares the gadget declares.
pub struct ParsedGadget {
    pub var_table: VariableTable,
    pub wire_table: WireTable,
    pub n: usize,
    pub secret_names: Vec<String>,
    pub random_names: Vec<String>,
    pub output_names: Vec<String>,
    /// `output_wires[o][k]` is the wire id of share k of output o.
    pub output_wires: Vec<Vec<usize>>,
    /// Every assigned wire id, in declaration order — the probeable
    /// index set I of §4.5. Output wires are included: the adversary may
    /// probe them directly in addition to whatever subset an RPC/RPE
    /// outer loop separately declassifies.
    pub probeable: Vec<usize>,
}

struct Binding {
    line: usize,
    name: String,
    expr: Polynomial,
    is_output: Option<(usize, usize)>,
}

pub fn parse(source: &str) -> Result<ParsedGadget> {
    let mut var_table = VariableTable::new();
    let mut secret_names: Vec<String> = Vec::new();
    let mut random_names: Vec<String> = Vec::new();
    let mut output_names: Vec<String> = Vec::new();
    let mut n: usize = 0;
    let mut saw_shares = false;

    let mut bound_expr: HashMap<String, Polynomial> = HashMap::new();
    let mut bindings: Vec<Binding> = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens[0] == KW_SHARES {
            if tokens.len() != 2 {
                return Err(parse_err(line_no, "SHARES expects exactly one integer argument"));
            }
            n = tokens[1]
                .parse()
                .map_err(|_| parse_err(line_no, "SHARES argument must be a positive integer"))?;
            if n == 0 {
                return Err(parse_err(line_no, "SHARES must be > 0"));
            }
            saw_shares = true;
        } else if tokens[0] == KW_IN {
            if !saw_shares {
                return Err(parse_err(line_no, "IN must follow a SHARES declaration"));
            }
            if tokens.len() < 2 {
                return Err(parse_err(line_no, "IN expects at least one secret name"));
            }
            for name in &tokens[1..] {
                var_table.declare_secret(name, n).map_err(|e| with_line(e, line_no))?;
                secret_names.push(name.to_string());
            }
        } else if tokens[0] == KW_RANDOMS {
            if tokens.len() < 2 {
                return Err(parse_err(line_no, "RANDOMS expects at least one name"));
            }
            let names: Vec<String> = tokens[1..].iter().map(|s| s.to_string()).collect();
            var_table.declare_randoms(&names).map_err(|e| with_line(e, line_no))?;
            random_names = names;
        } else if tokens[0] == KW_OUT {
            if tokens.len() < 2 {
                return Err(parse_err(line_no, "OUT expects at least one output name"));
            }
            output_names = tokens[1..].iter().map(|s| s.to_string()).collect();
        } else {
            // Assignment line: `<lhs> = <term> (+|*) <term> ...`
            if tokens.len() < 3 || tokens[1] != TOK_ASSIGN {
                return Err(parse_err(
                    line_no,
                    "expected an assignment of the form '<name> = <expr>'",
                ));
            }
            let lhs = tokens[0].to_string();
            let expr = parse_rhs(&tokens[2..], &var_table, &bound_expr, line_no)?;

            let is_output = classify_output(&lhs, &output_names, n);
            if let Some(prev) = bound_expr.get(&lhs) {
                if *prev != expr {
                    let what = if is_output.is_some() { "output" } else { "copy" };
                    return Err(parse_err(
                        line_no,
                        &format!(
                            "{what} assignment to '{lhs}' must repeat an identical expression"
                        ),
                    ));
                }
            } else {
                bound_expr.insert(lhs.clone(), expr.clone());
            }
            bindings.push(Binding { line: line_no, name: lhs, expr, is_output });
        }
    }

    if !saw_shares {
        return Err(parse_err(0, "missing SHARES declaration"));
    }
    if secret_names.is_empty() {
        return Err(parse_err(0, "missing IN declaration"));
    }
    if output_names.is_empty() {
        return Err(parse_err(0, "missing OUT declaration"));
    }

    build(var_table, bindings, n, secret_names, random_names, output_names)
}

fn build(
    var_table: VariableTable,
    bindings: Vec<Binding>,
    n: usize,
    secret_names: Vec<String>,
    random_names: Vec<String>,
    output_names: Vec<String>,
) -> Result<ParsedGadget> {
    let mut wire_table = WireTable::new(&var_table);

    // Group bindings by LHS name, preserving first-occurrence order.
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Binding>> = HashMap::new();
    for b in &bindings {
        groups.entry(b.name.clone()).or_insert_with(|| {
            order.push(b.name.clone());
            Vec::new()
        });
        groups.get_mut(&b.name).unwrap().push(b);
    }

    let mut output_wires: Vec<Vec<usize>> = vec![vec![usize::MAX; n]; output_names.len()];
    let mut probeable: Vec<usize> = Vec::new();

    for name in &order {
        let group = &groups[name];
        let first = group[0];
        if let Some((out_idx, share_idx)) = first.is_output {
            // Outputs are still physical wires an adversary can probe
            // directly; they are only special in that the RPC/RPE outer
            // loop may additionally hand a chosen subset of them to the
            // simulator "for free" (driver.rs `extra`).
            let id = wire_table.push_base(name.clone(), first.expr.clone(), 1)?;
            output_wires[out_idx][share_idx] = id;
            probeable.push(id);
        } else {
            let k = group.len();
            let nb_occ = if k > 1 { 2 * k - 1 } else { 1 };
            for (copy_idx, b) in group.iter().enumerate() {
                let wire_name = if copy_idx == 0 {
                    name.clone()
                } else {
                    format!("{name}$copy{copy_idx}")
                };
                let id = wire_table.push_base(wire_name, b.expr.clone(), nb_occ)?;
                probeable.push(id);
            }
        }
    }
    wire_table.seal();

    for (out_idx, out_name) in output_names.iter().enumerate() {
        for share_idx in 0..n {
            if output_wires[out_idx][share_idx] == usize::MAX {
                return Err(VerifierError::Parse {
                    line: bindings.last().map(|b| b.line).unwrap_or(0),
                    message: format!("output '{out_name}' is missing share {out_name}{share_idx}"),
                });
            }
        }
    }

    Ok(ParsedGadget {
        var_table,
        wire_table,
        n,
        secret_names,
        random_names,
        output_names,
        output_wires,
        probeable,
    })
}

fn classify_output(name: &str, output_names: &[String], n: usize) -> Option<(usize, usize)> {
    for (out_idx, prefix) in output_names.iter().enumerate() {
        if let Some(suffix) = name.strip_prefix(prefix.as_str()) {
            if let Ok(share_idx) = suffix.parse::<usize>() {
                if share_idx < n {
                    return Some((out_idx, share_idx));
                }
            }
        }
    }
    None
}

/// Parses a sum-of-products RHS: `+` separates summands, `*` multiplies
/// factors within a summand. Each factor names either a declared
/// share/random variable or an earlier LHS name.
fn parse_rhs(
    tokens: &[&str],
    var_table: &VariableTable,
    bound_expr: &HashMap<String, Polynomial>,
    line_no: usize,
) -> Result<Polynomial> {
    if tokens.is_empty() {
        return Err(parse_err(line_no, "empty right-hand side"));
    }
    if tokens.len() % 2 == 0 {
        return Err(parse_err(line_no, "malformed expression: dangling operator"));
    }

    let mut sum = Polynomial::zero();
    let mut product = resolve_term(tokens[0], var_table, bound_expr, line_no)?;

    let mut i = 1;
    while i < tokens.len() {
        let op = tokens[i];
        let term = resolve_term(tokens[i + 1], var_table, bound_expr, line_no)?;
        match op {
            TOK_XOR => {
                sum = sum.add(&product);
                product = term;
            }
            TOK_AND => {
                product = product.mul(&term);
            }
            other => {
                return Err(parse_err(line_no, &format!("unknown operator '{other}'")));
            }
        }
        i += 2;
    }
    sum = sum.add(&product);
    Ok(sum)
}

fn resolve_term(
    name: &str,
    var_table: &VariableTable,
    bound_expr: &HashMap<String, Polynomial>,
    line_no: usize,
) -> Result<Polynomial> {
    if let Some(id) = var_table.lookup(name) {
        return Ok(Polynomial::from_monomial(Monomial::from_vars(&[id as VarId])));
    }
    if let Some(expr) = bound_expr.get(name) {
        return Ok(expr.clone());
    }
    Err(parse_err(line_no, &format!("undefined symbol '{name}'")))
}

fn parse_err(line: usize, message: &str) -> VerifierError {
    VerifierError::Parse { line, message: message.to_string() }
}

fn with_line(err: VerifierError, line: usize) -> VerifierError {
    match err {
        VerifierError::Parse { message, .. } => VerifierError::Parse { line, message },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encoding_gadget() {
        let src = "SHARES 2\nIN a\nRANDOMS r\nOUT c\nc0 = a0 + r\nc1 = a1 + r\n";
        let gadget = parse(src).unwrap();
        assert_eq!(gadget.n, 2);
        assert_eq!(gadget.output_wires.len(), 1);
        // No intermediate wires were declared; only the two outputs,
        // which remain directly probeable.
        assert_eq!(gadget.probeable.len(), 2);
    }

    #[test]
    fn rejects_inconsistent_output_assignment() {
        let src = "SHARES 2\nIN a\nRANDOMS r\nOUT c\nc0 = a0 + r\nc0 = a0\n";
        assert!(parse(src).is_err());
    }

    #[test]
    fn copy_doubles_minus_one_nb_occ() {
        let src = "SHARES 2\nIN a\nRANDOMS r\nOUT c\nx = a0 + r\nx = a0 + r\nc0 = x\nc1 = a1\n";
        let gadget = parse(src).unwrap();
        // x's two copies, plus the two output wires c0/c1.
        assert_eq!(gadget.probeable.len(), 4);
        let copy_ids: Vec<usize> =
            gadget.probeable.iter().copied().filter(|&id| gadget.wire_table.wire(id).name.starts_with('x')).collect();
        assert_eq!(copy_ids.len(), 2);
        for id in copy_ids {
            assert_eq!(gadget.wire_table.wire(id).nb_occ, 3);
        }
    }
}
