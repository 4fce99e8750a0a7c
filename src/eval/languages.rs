//! Language code tables for the supported translation models
//!
//! SeamlessM4Tv2Large and NLLB name the same languages differently; the table
//! below pairs their codes. English is the evaluation target and is not
//! listed as a source.

/// Valid language codes, given as (SeamlessM4T, NLLB)
pub const LANGUAGE_CODES: &[(&str, &str)] = &[
    ("afr", "afr_Latn"),
    ("amh", "amh_Ethi"),
    ("arb", "arb_Arab"),
    ("ary", "ary_Arab"),
    ("arz", "arz_Arab"),
    ("asm", "asm_Beng"),
    ("azj", "azj_Latn"),
    ("bel", "bel_Cyrl"),
    ("ben", "ben_Beng"),
    ("bos", "bos_Latn"),
    ("bul", "bul_Cyrl"),
    ("cat", "cat_Latn"),
    ("ceb", "ceb_Latn"),
    ("ces", "ces_Latn"),
    ("ckb", "ckb_Arab"),
    ("cmn", "zho_Hans"),
    ("cmn_Hant", "zho_Hant"),
    ("cym", "cym_Latn"),
    ("dan", "dan_Latn"),
    ("deu", "deu_Latn"),
    ("ell", "ell_Grek"),
    ("est", "est_Latn"),
    ("eus", "eus_Latn"),
    ("fin", "fin_Latn"),
    ("fra", "fra_Latn"),
    ("fuv", "fuv_Latn"),
    ("gaz", "gaz_Latn"),
    ("gle", "gle_Latn"),
    ("glg", "glg_Latn"),
    ("guj", "guj_Gujr"),
    ("heb", "heb_Hebr"),
    ("hin", "hin_Deva"),
    ("hrv", "hrv_Latn"),
    ("hun", "hun_Latn"),
    ("hye", "hye_Armn"),
    ("ibo", "ibo_Latn"),
    ("ind", "ind_Latn"),
    ("isl", "isl_Latn"),
    ("ita", "ita_Latn"),
    ("jav", "jav_Latn"),
    ("jpn", "jpn_Jpan"),
    ("kan", "kan_Knda"),
    ("kat", "kat_Geor"),
    ("kaz", "kaz_Cyrl"),
    ("khk", "khk_Cyrl"),
    ("khm", "khm_Khmr"),
    ("kir", "kir_Cyrl"),
    ("kor", "kor_Hang"),
    ("lao", "lao_Laoo"),
    ("lit", "lit_Latn"),
    ("lug", "lug_Latn"),
    ("luo", "luo_Latn"),
    ("lvs", "lvs_Latn"),
    ("mai", "mai_Deva"),
    ("mal", "mal_Mlym"),
    ("mar", "mar_Deva"),
    ("mkd", "mkd_Cyrl"),
    ("mlt", "mlt_Latn"),
    ("mni", "mni_Beng"),
    ("mya", "mya_Mymr"),
    ("nld", "nld_Latn"),
    ("nno", "nno_Latn"),
    ("nob", "nob_Latn"),
    ("npi", "npi_Deva"),
    ("nya", "nya_Latn"),
    ("ory", "ory_Orya"),
    ("pan", "pan_Guru"),
    ("pbt", "pbt_Arab"),
    ("pes", "pes_Arab"),
    ("pol", "pol_Latn"),
    ("por", "por_Latn"),
    ("ron", "ron_Latn"),
    ("rus", "rus_Cyrl"),
    // FLORES carries sat_Olck, not sat_Beng
    ("sat", "sat_Beng"),
    ("slk", "slk_Latn"),
    ("slv", "slv_Latn"),
    ("sna", "sna_Latn"),
    ("snd", "snd_Arab"),
    ("som", "som_Latn"),
    ("spa", "spa_Latn"),
    ("srp", "srp_Cyrl"),
    ("swe", "swe_Latn"),
    ("swh", "swh_Latn"),
    ("tam", "tam_Taml"),
    ("tel", "tel_Telu"),
    ("tgk", "tgk_Cyrl"),
    ("tgl", "tgl_Latn"),
    ("tha", "tha_Thai"),
    ("tur", "tur_Latn"),
    ("ukr", "ukr_Cyrl"),
    ("urd", "urd_Arab"),
    ("uzn", "uzn_Latn"),
    ("vie", "vie_Latn"),
    ("yor", "yor_Latn"),
    ("yue", "yue_Hant"),
    ("zsm", "zsm_Latn"),
    ("zul", "zul_Latn"),
];

/// English as each model names it, given as (SeamlessM4T, NLLB)
pub const ENGLISH: (&str, &str) = ("eng", "eng_Latn");

/// Map a model's language code to the code FLORES uses for its column.
///
/// Chinese variants are labeled by script under the `zho` family rather than
/// `cmn`, and Santali appears in Ol Chiki script only.
pub fn flores_code(code: &str) -> &str {
    match code {
        "cmn" => "zho_Hans",
        "cmn_Hant" => "zho_Hant",
        "sat_Beng" => "sat_Olck",
        other => other,
    }
}

/// Look up the NLLB code paired with a SeamlessM4T code
pub fn nllb_code(seamless: &str) -> Option<&'static str> {
    LANGUAGE_CODES
        .iter()
        .find(|(s, _)| *s == seamless)
        .map(|(_, n)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_pairs_every_code() {
        assert_eq!(LANGUAGE_CODES.len(), 97);
        assert!(LANGUAGE_CODES.iter().all(|(s, n)| !s.is_empty() && !n.is_empty()));
    }

    #[test]
    fn test_english_is_not_a_source() {
        assert!(nllb_code("eng").is_none());
    }

    #[test]
    fn test_nllb_lookup() {
        assert_eq!(nllb_code("fra"), Some("fra_Latn"));
        assert_eq!(nllb_code("cmn"), Some("zho_Hans"));
        assert_eq!(nllb_code("nope"), None);
    }

    #[test]
    fn test_flores_overrides() {
        assert_eq!(flores_code("cmn"), "zho_Hans");
        assert_eq!(flores_code("cmn_Hant"), "zho_Hant");
        assert_eq!(flores_code("sat_Beng"), "sat_Olck");
        assert_eq!(flores_code("deu"), "deu");
    }
}
