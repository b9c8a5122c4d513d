use lagoon_macros::fixed_byte_array;

// Signatures are opaque protocol values here. Verifying them is the block
// applier's concern, so no curve arithmetic lives in this crate.
fixed_byte_array!(Signature, 64);
