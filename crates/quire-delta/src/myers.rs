// SPDX-License-Identifier: AGPL-3.0-or-later
//! Character-level minimal edit script (Myers, O(ND) time, linear space)

/// One run of the edit script, measured in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Equal(usize),
    Insert(usize),
    Delete(usize),
}

/// Shortest edit script turning `a` into `b`
pub fn diff(a: &[char], b: &[char]) -> Vec<Edit> {
    let mut out = Vec::new();
    diff_into(a, b, &mut out);
    out
}

fn diff_into(a: &[char], b: &[char], out: &mut Vec<Edit>) {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let (a_rest, b_rest) = (&a[prefix..], &b[prefix..]);
    let suffix = a_rest
        .iter()
        .rev()
        .zip(b_rest.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let a_mid = &a_rest[..a_rest.len() - suffix];
    let b_mid = &b_rest[..b_rest.len() - suffix];

    push(out, Edit::Equal(prefix));
    middle(a_mid, b_mid, out);
    push(out, Edit::Equal(suffix));
}

fn push(out: &mut Vec<Edit>, edit: Edit) {
    let n = match edit {
        Edit::Equal(n) | Edit::Insert(n) | Edit::Delete(n) => n,
    };
    if n == 0 {
        return;
    }
    match (out.last_mut(), edit) {
        (Some(Edit::Equal(m)), Edit::Equal(n))
        | (Some(Edit::Insert(m)), Edit::Insert(n))
        | (Some(Edit::Delete(m)), Edit::Delete(n)) => *m += n,
        _ => out.push(edit),
    }
}

/// Script for inputs sharing no prefix or suffix.
///
/// Finds the middle snake of the optimal path and recurses on both
/// halves, so memory stays linear in `a.len() + b.len()`.
fn middle(a: &[char], b: &[char], out: &mut Vec<Edit>) {
    if a.is_empty() {
        push(out, Edit::Insert(b.len()));
        return;
    }
    if b.is_empty() {
        push(out, Edit::Delete(a.len()));
        return;
    }
    match middle_snake(a, b) {
        Some((x, y)) => {
            diff_into(&a[..x], &b[..y], out);
            diff_into(&a[x..], &b[y..], out);
        }
        None => {
            push(out, Edit::Delete(a.len()));
            push(out, Edit::Insert(b.len()));
        }
    }
}

/// Point where the forward and reverse searches meet, if any
fn middle_snake(a: &[char], b: &[char]) -> Option<(usize, usize)> {
    let (n, m) = (a.len() as isize, b.len() as isize);
    let max_d = (n + m + 1) / 2;
    let offset = max_d;
    let size = (2 * max_d + 2) as usize;
    // Furthest x reached on each diagonal, -1 where unreached.
    let mut forward = vec![-1isize; size];
    let mut reverse = vec![-1isize; size];
    forward[(offset + 1) as usize] = 0;
    reverse[(offset + 1) as usize] = 0;
    let delta = n - m;
    // With an odd delta the paths overlap during the forward pass.
    let odd = delta % 2 != 0;
    let (mut k1_start, mut k1_end, mut k2_start, mut k2_end) = (0, 0, 0, 0);

    for d in 0..max_d {
        let mut k1 = -d + k1_start;
        while k1 <= d - k1_end {
            let i = (offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && forward[i - 1] < forward[i + 1]) {
                forward[i + 1]
            } else {
                forward[i - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n && y1 < m && a[x1 as usize] == b[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            forward[i] = x1;
            if x1 > n {
                k1_end += 2;
            } else if y1 > m {
                k1_start += 2;
            } else if odd {
                let j = offset + delta - k1;
                if (0..size as isize).contains(&j) && reverse[j as usize] != -1 {
                    let x2 = n - reverse[j as usize];
                    if x1 >= x2 {
                        return Some((x1 as usize, y1 as usize));
                    }
                }
            }
            k1 += 2;
        }

        let mut k2 = -d + k2_start;
        while k2 <= d - k2_end {
            let i = (offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && reverse[i - 1] < reverse[i + 1]) {
                reverse[i + 1]
            } else {
                reverse[i - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n && y2 < m && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize] {
                x2 += 1;
                y2 += 1;
            }
            reverse[i] = x2;
            if x2 > n {
                k2_end += 2;
            } else if y2 > m {
                k2_start += 2;
            } else if !odd {
                let j = offset + delta - k2;
                if (0..size as isize).contains(&j) && forward[j as usize] != -1 {
                    let x1 = forward[j as usize];
                    let y1 = offset + x1 - j;
                    if x1 >= n - x2 {
                        return Some((x1 as usize, y1 as usize));
                    }
                }
            }
            k2 += 2;
        }
    }
    None
}
