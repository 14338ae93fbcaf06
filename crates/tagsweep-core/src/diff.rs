//! Unified diff generation for dry-run previews.
//!
//! Produces zero-context hunks: common leading and trailing lines are
//! trimmed, the remaining region is aligned with a longest-common-subsequence
//! table, and each run of changed lines becomes one hunk. Regions too large
//! for the table fall back to a single replace hunk.

/// Largest `old * new` region aligned line by line.
const MAX_TABLE_CELLS: usize = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Keep,
    Remove,
    Add,
}

/// Generate a unified diff of `before` → `after` for `path`.
///
/// Returns an empty string when the two texts are identical.
pub fn unified_diff(path: &str, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();

    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let ops = align(old_mid, new_mid);

    let mut diff = format!("--- a/{}\n+++ b/{}\n", path, path);
    // 0-indexed positions into old/new, starting after the common prefix.
    let (mut oi, mut ni) = (prefix, prefix);
    let mut k = 0;
    while k < ops.len() {
        if ops[k] == Op::Keep {
            oi += 1;
            ni += 1;
            k += 1;
            continue;
        }
        let run_end = ops[k..]
            .iter()
            .position(|op| *op == Op::Keep)
            .map_or(ops.len(), |p| k + p);
        let run = &ops[k..run_end];
        let removed = run.iter().filter(|op| **op == Op::Remove).count();
        let added = run.len() - removed;

        diff.push_str(&format!(
            "@@ -{} +{} @@\n",
            hunk_range(oi, removed),
            hunk_range(ni, added)
        ));
        for line in &old[oi..oi + removed] {
            diff.push_str(&format!("-{}\n", line));
        }
        for line in &new[ni..ni + added] {
            diff.push_str(&format!("+{}\n", line));
        }

        oi += removed;
        ni += added;
        k = run_end;
    }
    diff
}

/// Hunk range in unified diff notation for a run starting at 0-indexed
/// `start` with `count` lines.
fn hunk_range(start: usize, count: usize) -> String {
    match count {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        n => format!("{},{}", start + 1, n),
    }
}

/// Edit script turning `old` into `new`. Within each changed run, removals
/// come before additions.
fn align(old: &[&str], new: &[&str]) -> Vec<Op> {
    let (n, m) = (old.len(), new.len());
    if n == 0 || m == 0 || n.saturating_mul(m) > MAX_TABLE_CELLS {
        let mut ops = vec![Op::Remove; n];
        ops.resize(n + m, Op::Add);
        return ops;
    }

    // lcs[i][j] = LCS length of old[i..] and new[j..]
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    let mut pending_adds = 0;
    while i < n || j < m {
        if i < n && j < m && old[i] == new[j] {
            ops.resize(ops.len() + pending_adds, Op::Add);
            pending_adds = 0;
            ops.push(Op::Keep);
            i += 1;
            j += 1;
        } else if j < m && (i == n || lcs[i][j + 1] >= lcs[i + 1][j]) {
            pending_adds += 1;
            j += 1;
        } else {
            ops.push(Op::Remove);
            i += 1;
        }
    }
    ops.resize(ops.len() + pending_adds, Op::Add);
    ops
}
