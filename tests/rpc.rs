use rps_verify::config::VerifierConfig;
use rps_verify::gadget;
use rps_verify::verify::modes;

fn config() -> VerifierConfig {
    VerifierConfig::new(64, 0, 1).unwrap()
}

#[test]
fn isw_and_gadget_rpc_has_nonzero_top_coefficient() {
    // With the whole output declassified (t_output = n, the only choice
    // for a 2-share output), any 2-tuple that also touches both inputs'
    // shares is bound to exceed the order-1 threshold once the output is
    // known for free.
    let src = "SHARES 2\nIN a b\nRANDOMS r\nOUT c\n\
               c0 = a0 * b0 + r\n\
               c1 = a1 * b1 + r + a0 * b1 + a1 * b0\n";
    let g = gadget::parse(src).unwrap();
    let hist = modes::rpc(&g, 1, 2, 2, &config()).unwrap();
    assert!(!hist.is_all_zero());
}

#[test]
fn rejects_order_equal_to_share_count() {
    let src = "SHARES 2\nIN a\nRANDOMS r\nOUT c\nc0 = a0 + r\nc1 = a1 + r\n";
    let g = gadget::parse(src).unwrap();
    assert!(modes::rpc(&g, 2, 2, 2, &config()).is_err());
}

#[test]
fn rejects_t_output_larger_than_output_width() {
    let src = "SHARES 2\nIN a\nRANDOMS r\nOUT c\nc0 = a0 + r\nc1 = a1 + r\n";
    let g = gadget::parse(src).unwrap();
    assert!(modes::rpc(&g, 1, 3, 2, &config()).is_err());
}
