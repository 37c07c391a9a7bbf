use rps_verify::config::VerifierConfig;
use rps_verify::gadget;
use rps_verify::verify::modes::{self, ProbingOutcome};

fn config() -> VerifierConfig {
    VerifierConfig::new(64, 0, 1).unwrap()
}

#[test]
fn encoding_gadget_is_secure_at_t1() {
    let src = "SHARES 2\nIN a\nRANDOMS r\nOUT c\nc0 = a0 + r\nc1 = a1 + r\n";
    let g = gadget::parse(src).unwrap();
    let outcome = modes::t_probing(&g, 1, &config()).unwrap();
    assert!(matches!(outcome, ProbingOutcome::Secure));
}

#[test]
fn isw_and_gadget_is_secure_at_t1() {
    // Classic 2-share ISW multiplication: r_{0,1} = r, r_{1,0} = r + a0*b1 + a1*b0.
    let src = "SHARES 2\nIN a b\nRANDOMS r\nOUT c\n\
               c0 = a0 * b0 + r\n\
               c1 = a1 * b1 + r + a0 * b1 + a1 * b0\n";
    let g = gadget::parse(src).unwrap();
    let outcome = modes::t_probing(&g, 1, &config()).unwrap();
    assert!(matches!(outcome, ProbingOutcome::Secure));
}

#[test]
fn broken_refresh_is_secure_at_t1_but_not_at_full_output() {
    // c1 leaks a1 directly with no masking: each single share alone is
    // still below saturation (n=2 needs both share indices), so t=1
    // passes, but the full 2-share output set reconstructs the secret.
    let src = "SHARES 2\nIN a\nRANDOMS r\nOUT c\nc0 = a0 + r\nc1 = a1\n";
    let g = gadget::parse(src).unwrap();

    let at_t1 = modes::t_probing(&g, 1, &config()).unwrap();
    assert!(matches!(at_t1, ProbingOutcome::Secure));

    let mut wt = g.wire_table.clone();
    let mut filter = rps_verify::verify::filter::IncompressibilityFilter::new();
    let failures = rps_verify::verify::driver::enumerate_level(
        &g.probeable,
        2,
        &mut wt,
        rps_verify::verify::rules::Rule1Variant::Saturated,
        &config(),
        &mut filter,
        &[],
    )
    .unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].witness_names, vec!["c0".to_string(), "c1".to_string()]);
}

#[test]
fn and_only_gadget_with_no_randoms_always_fails() {
    let src = "SHARES 2\nIN a\nOUT c\nc0 = a0 * a1\nc1 = a1\n";
    let g = gadget::parse(src).unwrap();
    let outcome = modes::t_probing(&g, 1, &config()).unwrap();
    assert!(matches!(outcome, ProbingOutcome::Insecure { .. }));
}
