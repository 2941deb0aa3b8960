//! Script-driven tests.
//!
//! A script is a sequence of blocks:
//!
//! ```text
//! # comment
//! command key=value key=(v1, v2) flag
//! input lines
//! ----
//! expected output
//! <blank line>
//! ```

use std::{fs, path::Path};

use regex::Regex;

use crate::error::Result;

#[derive(Default)]
pub struct TestData {
    pub pos: String,
    pub cmd: String,
    pub cmd_args: Vec<CmdArg>,
    pub input: String,
    pub expected: String,
}

pub struct CmdArg {
    pub key: String,
    pub vals: Vec<String>,
}

impl CmdArg {
    pub fn string(&self, idx: usize) -> String {
        self.vals[idx].clone()
    }
    pub fn uint64(&self, idx: usize) -> u64 {
        self.vals[idx].parse().unwrap()
    }
    pub fn float64(&self, idx: usize) -> f64 {
        self.vals[idx].parse().unwrap()
    }
}

impl TestData {
    pub fn find_arg(&self, key: &str) -> Option<&CmdArg> {
        self.cmd_args.iter().find(|&f| f.key == key)
    }
    pub fn scan_args(&self, key: &str) -> &CmdArg {
        if let Some(arg) = self.find_arg(key) {
            arg
        } else {
            panic!("{}: missing args: {}", self.pos, key);
        }
    }
}

pub fn run_test<F: FnMut(&TestData) -> String>(path: impl AsRef<Path>, f: F) -> Result<()> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    run_test_from_string(content, &path.display().to_string(), f)
}

pub fn run_test_from_string<F: FnMut(&TestData) -> String>(
    input: impl AsRef<str>,
    source: &str,
    mut f: F,
) -> Result<()> {
    let datas = parse_test_data(input.as_ref(), source)?;
    for data in datas.iter() {
        let s = f(data);
        assert_eq!(s, data.expected, "{}: {}", data.pos, data.cmd);
    }
    Ok(())
}

pub fn parse_test_data(input: &str, source: &str) -> Result<Vec<TestData>> {
    let mut datas = Vec::new();

    let mut iter = input.lines().enumerate();
    while let Some((line_no, line)) = iter.next() {
        if line.starts_with('#') {
            continue;
        }
        let fields = split_directive(line);
        if fields.is_empty() {
            continue;
        }

        let mut data = TestData {
            pos: format!("{}:{}", source, line_no + 1),
            cmd: fields[0].clone(),
            ..Default::default()
        };
        for arg in &fields[1..] {
            if let Some(idx) = arg.find('=') {
                let key = arg[0..idx].to_owned();
                let val = &arg[idx + 1..];

                let vals = if val.len() > 2 && val.starts_with('(') && val.ends_with(')') {
                    val[1..val.len() - 1]
                        .split(',')
                        .map(|s| s.trim().to_owned())
                        .collect()
                } else {
                    vec![val.to_owned()]
                };
                data.cmd_args.push(CmdArg { key, vals });
            } else {
                data.cmd_args.push(CmdArg {
                    key: arg.clone(),
                    vals: Vec::new(),
                })
            }
        }

        let mut buf = String::new();
        let mut separator = false;
        for (_, line) in iter.by_ref() {
            if line == "----" {
                separator = true;
                break;
            }
            buf.push_str(line);
            buf.push('\n');
        }
        data.input = buf.trim().to_owned();

        // Expected output runs up to the next blank line.
        if separator {
            let mut buf = String::new();
            for (_, line) in iter.by_ref() {
                let line = line.trim();
                if line.is_empty() {
                    break;
                }
                buf.push_str(line);
                buf.push('\n');
            }
            data.expected = buf;
        }
        datas.push(data);
    }

    Ok(datas)
}

const PATTERN: &str = r"^ *[a-zA-Z0-9_/,-\.]+(|=[-a-zA-Z0-9_@.]+|=\([^)]*\))( |$)";

fn split_directive(mut line: &str) -> Vec<String> {
    let p = Regex::new(PATTERN).unwrap();
    let mut results = Vec::new();
    while !line.trim().is_empty() {
        let m = p
            .find(line)
            .unwrap_or_else(|| panic!("cannot parse directive: {}", line));
        let v = m.as_str();
        line = &line[v.len()..];
        results.push(v.trim().to_string());
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_directive() {
        let input = "range-score min=-1.5 max=(2, 🍌) member=a_b verbose";
        let cmds = split_directive(input);
        assert_eq!(cmds.len(), 5);
        assert_eq!(cmds[0], "range-score");
        assert_eq!(cmds[1], "min=-1.5");
        assert_eq!(cmds.last().unwrap(), "verbose");
    }

    #[test]
    fn test_from_string() {
        let input = r"
# NB: duplicate args are allowed; scan_args picks the first occurrence.
make argTuple=(1, 🍌) argFloat=12.5 argString=greedily argString=totally_ignored
sentence
----
Did the following: make sentence
1 hungry monkey eats a 🍌
while 12.5 other monkeys watch greedily

second
----
ok
";
        let mut calls = 0;
        run_test_from_string(input, "inline", |t| {
            calls += 1;
            if t.cmd == "second" {
                assert!(t.cmd_args.is_empty());
                return "ok\n".to_string();
            }
            assert_eq!(t.cmd, "make");
            assert_eq!(t.input, "sentence");
            assert_eq!(t.cmd_args.len(), 4);
            let arg_str = t.scan_args("argString");
            assert_eq!(arg_str.string(0), "greedily");
            let arg_float = t.scan_args("argFloat");
            assert_eq!(arg_float.float64(0), 12.5);
            let arg_tuple = t.scan_args("argTuple");
            assert_eq!(arg_tuple.uint64(0), 1);
            format!(
                "Did the following: {} {}\n{} hungry monkey eats a {}\nwhile {} other monkeys watch {}\n",
                t.cmd,
                t.input,
                arg_tuple.uint64(0),
                arg_tuple.string(1),
                arg_float.float64(0),
                arg_str.string(0)
            )
        })
        .unwrap();
        assert_eq!(calls, 2);
    }
}
