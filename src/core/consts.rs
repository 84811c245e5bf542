//! Fixed on-chain artifacts and action constants
//!
//! Centralized registry for the two compiled scripts and the values every
//! action derives from them. Dispatcher logic never embeds these literals.

/// Compiled Plutus V3 scripts (blueprint `compiledCode`, single CBOR encoded)
pub mod scripts {
    /// Minting policy: always succeeds.
    pub const MINT: &str = concat!(
        "58b801010032323232323232323225333003323232323253330083370e900018051baa00113253333330100031533300",
        "93370e900018059baa0031533300d300c37540062944020020020020020020dd7180698059baa00116300c300d002300",
        "b001300b0023009001300637540022930a998022491856616c696461746f722072657475726e65642066616c73650013",
        "656153300249010f5f72656465656d65723a20566f696400165734ae7155ceaab9e5573eae855d12ba41",
    );

    /// Spending validator, parameterized by the owner's payment key hash.
    pub const SPEND: &str = concat!(
        "5903cb010100323232323232323232232253330053232323232533300a3370e900118061baa001132323253333330140",
        "051533300d3370e900018079baa005153330113010375400a264a6601e66e59241134578747261205369676e61746f72",
        "6965733a200037326664646464646002002444a6664666603a00626464646464646601800400266e2922010128000025",
        "33301a337100069007099b80483c80400c54ccc068cdc4001a410004266e00cdc0241002800690068b299980e800899b",
        "8a4881035b5d2900005133714911035b5f2000333300800133714911025d290000522333009009002300600122333009",
        "009002001375860360046eb4c064004c8cdd81ba83019001374e60340026ea800c4c94ccc06c0044cdc52441027b7d00",
        "003133714911037b5f200032323300100100322533301e00110031533301e3020001132333009009301d001337149101",
        "023a2000333009009301e001004301f001132333009009301d001337149101023a2000333009009301e0013006330030",
        "033021002301f0013371491102207d000033756006264a666036002266e29221025b5d00003133714911035b5f200033",
        "3300600133714911015d000032233300700700230040012233300700700200137580066e292201022c2000133005375a",
        "0040022646466e2922010268270000132333001001337006e34009200133714911012700003222533301933710004900",
        "00800899191919980300319b8000548004cdc599b80002533301c33710004900a0a40c02903719b8b33700002a666038",
        "66e2000520141481805206e0043370c004901019b8300148080cdc70020011bae0022222323300100100522533301b00",
        "110051533301b301d001133003301c001005133004301c00133002002301d0012232330010010032253330143370e002",
        "9000099b8a488101300000315333014337100029000099b8a489012d003300200233702900000089980299b840014805",
        "0cdc599b803370a002900a240c00066002002444a66602266e2400920001001133300300333708004900a19b8b337006",
        "6e14009201448180004dd3800a45001323300100100222533301400114a0264a66602266e3cdd7180b0010070a511330",
        "030030013016001375860246026602660266026602660266026602660206ea801c030030030030030030c044c048008c",
        "040004c034dd50008b1807180780118068009806801180580098041baa001149854cc01924011856616c696461746f72",
        "2072657475726e65642066616c73650013656375c0022a660049210f5f72656465656d65723a20566f696400165734ae",
        "7155ceaab9e5573eae855d12ba41",
    );
}

/// Token minted, burned and locked by the four actions
pub mod asset {
    pub const NAME: &str = "Always True Token";
    pub const QUANTITY: i128 = 1_000;
    pub const IMAGE: &str = "https://avatars.githubusercontent.com/u/1";
}

/// Transaction metadata labels
pub mod metadata {
    /// CIP-25 NFT/token metadata
    pub const CIP25_LABEL: u64 = 721;
}

/// Ledger units
pub mod ledger {
    pub const LOVELACE: &str = "lovelace";
    /// Smallest lovelace amount attached to a contract output
    pub const MIN_UTXO_LOVELACE: i128 = 1_000_000;
}
