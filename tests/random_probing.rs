use rps_verify::config::VerifierConfig;
use rps_verify::gadget;
use rps_verify::verify::modes;

fn config() -> VerifierConfig {
    VerifierConfig::new(64, 0, 1).unwrap()
}

#[test]
fn encoding_gadget_histogram_fails_only_at_full_pair() {
    // c0 = a0+r, c1 = a1+r share the same mask: individually each wire
    // reduces to a bare random under Rule 2, but together they already
    // touch every share before any rule gets a chance to run.
    let src = "SHARES 2\nIN a\nRANDOMS r\nOUT c\nc0 = a0 + r\nc1 = a1 + r\n";
    let g = gadget::parse(src).unwrap();
    let hist = modes::random_probing(&g, 2, &config()).unwrap();
    assert_eq!(hist.c, vec![0, 0, 1]);
}

#[test]
fn linear_refresh_only_fails_at_the_full_output_set() {
    // Every proper subset of {c0,c1,c2} is disproven by Rule 2 (each
    // random is carried linearly by exactly one member of any 2-subset);
    // the full 3-share output set trivially reconstructs the secret.
    let src = "SHARES 3\nIN a\nRANDOMS r0 r1\nOUT c\n\
               c0 = a0 + r0\nc1 = a1 + r0 + r1\nc2 = a2 + r1\n";
    let g = gadget::parse(src).unwrap();
    let hist = modes::random_probing(&g, 3, &config()).unwrap();
    assert_eq!(hist.c, vec![0, 0, 0, 1]);
}

#[test]
fn and_only_gadget_fails_at_every_size() {
    let src = "SHARES 2\nIN a\nOUT c\nc0 = a0 * a1\nc1 = a1\n";
    let g = gadget::parse(src).unwrap();
    let hist = modes::random_probing(&g, 2, &config()).unwrap();
    // c0 alone already saturates; c1 alone does not ({a1} is one bit).
    assert_eq!(hist.c[1], 1);
}
