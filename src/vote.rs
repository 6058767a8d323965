//! Parser for community vote strings such as `"BC (80%)"`.
//!
//! A vote is one or more uppercase option labels followed by an optional
//! parenthesised approval percentage.

use std::collections::BTreeSet;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map, map_res, opt, recognize},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub labels: BTreeSet<char>,
    pub percent: Option<f32>,
}

impl Vote {
    pub fn parse(input: &str) -> Option<Self> {
        match all_consuming(vote)(input.trim()) {
            Ok((_, v)) => Some(v),
            Err(_) => None,
        }
    }

    pub fn label_string(&self) -> String {
        self.labels.iter().collect()
    }
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.percent {
            Some(p) => write!(f, "{} ({}%)", self.label_string(), p),
            None => write!(f, "{}", self.label_string()),
        }
    }
}

fn labels(input: &str) -> IResult<&str, BTreeSet<char>> {
    map(take_while1(|c: char| c.is_ascii_uppercase()), |s: &str| {
        s.chars().collect()
    })(input)
}

fn number(input: &str) -> IResult<&str, f32> {
    map_res(
        alt((recognize(tuple((digit1, char('.'), digit1))), digit1)),
        |s: &str| s.parse::<f32>(),
    )(input)
}

fn percent(input: &str) -> IResult<&str, f32> {
    delimited(
        pair(char('('), multispace0),
        terminated(number, pair(multispace0, char('%'))),
        pair(multispace0, char(')')),
    )(input)
}

fn vote(input: &str) -> IResult<&str, Vote> {
    map(
        pair(labels, opt(preceded(multispace0, percent))),
        |(labels, percent)| Vote { labels, percent },
    )(input)
}
