// Behavioural properties of the combinator core, exercised through the
// public API only.

use parcomb::{
    CaseSensitivity, Notation, NumberOptions, ParseError, Parser, ParserResult, ParserState, Sign,
    UserInfoKey, alternative, attempt, char, digit, fail, integer, just, look_ahead, many,
    many_separated, number_literal, set_user_info, string, tuple, user_info,
};

macro_rules! test_cases {
    ($($name:ident: $test:expr),* $(,)?) => {
        $(
            #[test]
            fn $name() {
                $test
            }
        )*
    };
}

fn lit(text: &str) -> ParseError {
    ParseError::expected_string(text, CaseSensitivity::Sensitive)
}

/// Fails at byte 2 of "abd" after consuming "ab".
fn consuming_failure() -> Parser<char> {
    string("ab").then(char('c'))
}

struct Flag;

impl UserInfoKey for Flag {
    type Value = bool;

    fn default_value() -> bool {
        false
    }
}

// ============================================================================
// Section: Ordered choice
// ============================================================================

test_cases! {
    test_no_progress_choice_runs_rhs: {
        let state = ParserState::new("z");
        let choice = alternative(char('x'), char('z'));
        assert_eq!(choice.parse(&state), char('z').parse(&state));
    },

    test_no_progress_choice_prepends_errors: {
        let state = ParserState::new("z");
        let reply = alternative(char('x'), char('y')).parse(&state);
        assert_eq!(reply.state, state);
        assert_eq!(
            reply.result,
            ParserResult::Failure { errors: vec![lit("x"), lit("y")] }
        );
    },

    test_committed_failure_skips_rhs: {
        let state = ParserState::new("abd");
        let choice = alternative(consuming_failure(), just('!'));
        assert_eq!(choice.parse(&state), consuming_failure().parse(&state));
        assert_eq!(choice.parse(&state).state.position(), 2);
    },

    test_user_info_change_counts_as_progress: {
        let state = ParserState::new("");
        let committed = set_user_info::<Flag>(true).then(fail::<u8>("boom"));
        let reply = alternative(committed, just(1)).parse(&state);
        assert!(!reply.is_success());
        assert!(reply.state.user_info::<Flag>());
        assert_eq!(reply.errors(), &[ParseError::generic("boom")]);
    },
}

// ============================================================================
// Section: Backtracking
// ============================================================================

test_cases! {
    test_attempt_restores_state_and_nests: {
        let state = ParserState::new("abd");
        let reply = attempt(consuming_failure()).parse(&state);
        assert_eq!(reply.state, state);
        assert_eq!(reply.errors(), &[ParseError::nested(2, vec![lit("c")])]);
    },

    test_attempt_never_double_nests: {
        let inner = attempt(string("b").then(char('c')));
        let outer = attempt(char('a').then(inner));
        let reply = outer.parse(&ParserState::new("abd"));
        assert_eq!(reply.state.position(), 0);
        assert_eq!(reply.errors(), &[ParseError::nested(2, vec![lit("c")])]);
    },

    test_attempt_lets_choice_continue: {
        let choice = attempt(string("ab").then(char('c'))).or_else(string("abd").map(|_| 'd'));
        assert_eq!(choice.run("abd"), Ok('d'));
    },

    test_look_ahead_never_consumes: {
        let state = ParserState::new("abd");
        assert_eq!(look_ahead(string("ab")).parse(&state).state, state);
        assert_eq!(look_ahead(consuming_failure()).parse(&state).state, state);
        assert_eq!(look_ahead(char('q')).parse(&state).state, state);
    },

    test_look_ahead_success_is_free: {
        let state = ParserState::new("ab");
        let reply = look_ahead(string("ab")).parse(&state);
        assert_eq!(reply.result, ParserResult::Success { value: "ab".to_string(), errors: vec![] });
    },
}

// ============================================================================
// Section: Labels
// ============================================================================

test_cases! {
    test_label_keeps_errors_after_progress: {
        let state = ParserState::new("abd");
        let labelled = consuming_failure().label("abc").parse(&state);
        assert_eq!(labelled, consuming_failure().parse(&state));
    },

    test_label_replaces_errors_without_progress: {
        let reply = consuming_failure().label("abc").parse(&ParserState::new("xyz"));
        assert_eq!(reply.errors(), &[ParseError::expected("abc")]);
    },

    test_number_label_hides_alternatives: {
        let options = NumberOptions::new().with_hex(true);
        let err = number_literal(options).run("xyz").unwrap_err();
        assert_eq!(err.position, 0);
        assert_eq!(err.errors, vec![ParseError::expected("number")]);
    },
}

// ============================================================================
// Section: Repetition
// ============================================================================

fn digit_value() -> Parser<u32> {
    digit().map(|ch| ch.to_digit(10).unwrap_or_default())
}

test_cases! {
    test_many_min_count_boundary: {
        let two = many(char('a'), 2);
        assert!(two.run("a").is_err());
        assert_eq!(two.run("aa"), Ok(vec!['a', 'a']));
        assert_eq!(two.run("aaa"), Ok(vec!['a', 'a', 'a']));
    },

    test_many_zero_never_fails_on_zero_iterations: {
        assert_eq!(many(char('a'), 0).run(""), Ok(vec![]));
        let reply = many(char('a'), 0).parse(&ParserState::new("b"));
        assert_eq!(reply.result.into_value(), Some(vec![]));
    },

    test_many_propagates_consuming_failure: {
        let pairs = many(char('a').then(char('b')), 0);
        let err = pairs.run("ababa").unwrap_err();
        assert_eq!(err.position, 5);
        assert_eq!(err.errors, vec![lit("b")]);
    },

    test_separated_digits: {
        let list = many_separated(digit_value(), char(','), false, 1);
        assert_eq!(list.run("1,2,3"), Ok(vec![1, 2, 3]));
    },

    test_trailing_separator_rejected: {
        let list = many_separated(digit_value(), char(','), false, 1);
        let err = list.run("1,2,").unwrap_err();
        assert_eq!(err.position, 4);
        assert_eq!(err.errors, vec![ParseError::expected("digit")]);
    },

    test_trailing_separator_allowed: {
        let list = many_separated(digit_value(), char(','), true, 1);
        assert_eq!(list.run("1,2,"), Ok(vec![1, 2]));
        assert_eq!(list.run("1,2"), Ok(vec![1, 2]));
    },
}

#[test]
#[should_panic(expected = "infinite loop")]
fn test_many_guards_against_zero_width_success() {
    let _ = many(just(()), 0).run("abc");
}

#[test]
#[should_panic(expected = "infinite loop")]
fn test_many_guards_against_user_info_reads() {
    let _ = many(user_info::<Flag>(), 0).run("");
}

// ============================================================================
// Section: Round trips
// ============================================================================

test_cases! {
    test_decimal_integer: {
        let reply = integer().parse(&ParserState::new("123"));
        assert_eq!(reply.state.remaining(), "");
        assert_eq!(reply.result.into_value(), Some(123));
    },

    test_signed_hex_literal: {
        let options = NumberOptions::new().with_hex(true);
        let literal = number_literal(options).run("-0x1A").unwrap();
        assert_eq!(literal.sign, Sign::Minus);
        assert_eq!(literal.notation, Notation::Hexadecimal);
        assert_eq!(literal.integer_part, "1A");
        assert_eq!(literal.integer_value(), Some(-26));
    },

    test_tuple_of_chars: {
        let pair = tuple((char('a'), char('b')));
        let reply = pair.parse(&ParserState::new("ab"));
        assert_eq!(reply.state.remaining(), "");
        assert_eq!(reply.result.into_value(), Some(('a', 'b')));

        let reply = pair.parse(&ParserState::new("ac"));
        assert_eq!(reply.state.position(), 1);
        assert_eq!(reply.errors(), &[lit("b")]);
    },
}
