use lagoon_macros::fixed_byte_array;

fixed_byte_array!(PublicKey, 32);
