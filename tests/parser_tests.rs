use filingintel::parser::{parse_2l, TwoLSummary};

#[test]
fn test_parse_well_formed_response() {
    let response = "1. Board approved capex of Rs 500 crore\n\
                    2. Capacity rises 20% to 1.2 MTPA\n\
                    3. Expansion funded by internal accruals; margins seen up 2%\n\
                    4. The company is building a bigger factory\n\
                    5. Expansion\n\
                    6. Good for the company: more volume and better margins.";

    let parsed = parse_2l(response);

    assert_eq!(
        parsed,
        TwoLSummary {
            key_pointers: "Board approved capex of Rs 500 crore".to_string(),
            summary: "Capacity rises 20% to 1.2 MTPA".to_string(),
            final_summary: "Expansion funded by internal accruals; margins seen up 2%".to_string(),
            explain_like_five: "The company is building a bigger factory".to_string(),
            one_word: "Expansion".to_string(),
            good_or_bad: "Good for the company: more volume and better margins.".to_string(),
        }
    );
}

#[test]
fn test_indented_lines_and_noise_are_handled() {
    let response = "Here is the 2l format:\n\n   1.   Key point  \n- bullet that is ignored\n\t6. Bad";
    let parsed = parse_2l(response);

    assert_eq!(parsed.key_pointers, "Key point");
    assert_eq!(parsed.good_or_bad, "Bad");
    assert_eq!(parsed.summary, "");
    assert_eq!(parsed.one_word, "");
}

#[test]
fn test_error_text_yields_empty_fields() {
    let parsed = parse_2l("Error: rate limited");
    assert_eq!(parsed, TwoLSummary::default());
}

#[test]
fn test_only_text_after_first_dot_is_kept() {
    // Decimal points later on the line survive
    let parsed = parse_2l("2. Revenue grew 12.5% YoY.");
    assert_eq!(parsed.summary, "Revenue grew 12.5% YoY.");
}

#[test]
fn test_markdown_numbering_without_dot_is_ignored() {
    let parsed = parse_2l("1) Key pointers\n**1.** bold");
    assert_eq!(parsed.key_pointers, "");
}
