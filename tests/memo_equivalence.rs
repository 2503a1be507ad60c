//! Every built-in problem against a direct exhaustive search.

use mask_dp::problems::{
    balance::AccountBalance,
    distribute::Distribution,
    game::CanIWin,
    good_subsets::GoodSubsets,
    hats::HatAssignment,
    partition::{EqualPartition, MinCostPartition},
    sos::{mobius_subsets, sum_over_subsets, sum_over_supersets},
};
use mask_dp::Coverage;
use proptest::prelude::*;

/// Calls `visit` with every partition of `0..n` into non-empty blocks.
fn set_partitions(n: usize, visit: &mut impl FnMut(&[Vec<usize>])) {
    fn go(i: usize, n: usize, blocks: &mut Vec<Vec<usize>>, visit: &mut impl FnMut(&[Vec<usize>])) {
        if i == n {
            visit(blocks);
            return;
        }
        for b in 0..blocks.len() {
            blocks[b].push(i);
            go(i + 1, n, blocks, visit);
            blocks[b].pop();
        }
        blocks.push(vec![i]);
        go(i + 1, n, blocks, visit);
        blocks.pop();
    }
    go(0, n, &mut Vec::new(), visit);
}

fn brute_hats(prefs: &[Vec<usize>], min_covered: usize) -> i64 {
    fn go(p: usize, prefs: &[Vec<usize>], used: &mut Vec<usize>, covered: usize, min: usize) -> i64 {
        if p == prefs.len() {
            return i64::from(covered >= min);
        }
        let mut total = go(p + 1, prefs, used, covered, min);
        for &h in &prefs[p] {
            if !used.contains(&h) {
                used.push(h);
                total += go(p + 1, prefs, used, covered + 1, min);
                used.pop();
            }
        }
        total
    }
    go(0, prefs, &mut Vec::new(), 0, min_covered)
}

fn brute_good_subsets(nums: &[u32]) -> i64 {
    let mut count = 0;
    for pick in 1u32..(1 << nums.len()) {
        let mut product: u64 = 1;
        for (i, &v) in nums.iter().enumerate() {
            if pick >> i & 1 == 1 {
                product *= u64::from(v);
            }
        }
        let squarefree = (2..=30u64).all(|p| product % (p * p) != 0);
        if product > 1 && squarefree {
            count += 1;
        }
    }
    count
}

fn brute_equal_partition(weights: &[i64], k: usize) -> bool {
    let total: i64 = weights.iter().sum();
    if total % k as i64 != 0 {
        return false;
    }
    let target = total / k as i64;
    let mut found = false;
    set_partitions(weights.len(), &mut |blocks| {
        if blocks.len() == k
            && blocks
                .iter()
                .all(|b| b.iter().map(|&i| weights[i]).sum::<i64>() == target)
        {
            found = true;
        }
    });
    found
}

fn brute_bins(weights: &[i64], capacity: i64) -> Option<i64> {
    let mut best: Option<i64> = None;
    set_partitions(weights.len(), &mut |blocks| {
        if blocks
            .iter()
            .all(|b| b.iter().map(|&i| weights[i]).sum::<i64>() <= capacity)
        {
            let used = blocks.len() as i64;
            best = Some(best.map_or(used, |b| b.min(used)));
        }
    });
    best
}

fn brute_distribute(stock: &[(i64, i64)], quantity: &[i64], min_served: usize) -> bool {
    fn go(c: usize, stock: &mut [(i64, i64)], quantity: &[i64], served: usize, min: usize) -> bool {
        if c == quantity.len() {
            return served >= min;
        }
        if go(c + 1, stock, quantity, served, min) {
            return true;
        }
        for v in 0..stock.len() {
            if stock[v].1 >= quantity[c] {
                stock[v].1 -= quantity[c];
                let ok = go(c + 1, stock, quantity, served + 1, min);
                stock[v].1 += quantity[c];
                if ok {
                    return true;
                }
            }
        }
        false
    }
    go(0, &mut stock.to_vec(), quantity, 0, min_served)
}

fn brute_transfers(balances: &[i64]) -> usize {
    let nonzero: Vec<i64> = balances.iter().copied().filter(|&b| b != 0).collect();
    let mut groups = 0;
    set_partitions(nonzero.len(), &mut |blocks| {
        if blocks
            .iter()
            .all(|b| b.iter().map(|&i| nonzero[i]).sum::<i64>() == 0)
        {
            groups = groups.max(blocks.len());
        }
    });
    nonzero.len() - groups
}

fn brute_game(max_choice: u32, target: i64) -> bool {
    if target <= 0 {
        return true;
    }
    if i64::from(max_choice * (max_choice + 1) / 2) < target {
        return false;
    }
    brute_game_from(0, 0, max_choice, target)
}

/// Whether the player to move wins, with numbers marked in `used` taken.
fn brute_game_from(used: u32, total: i64, m: u32, target: i64) -> bool {
    (1..=m).any(|x| {
        used >> x & 1 == 0
            && (total + i64::from(x) >= target
                || !brute_game_from(used | 1 << x, total + i64::from(x), m, target))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn hats_match_enumeration(
        prefs in prop::collection::vec(prop::collection::btree_set(0usize..7, 0..5), 0..5),
        k in 0usize..5,
    ) {
        let prefs: Vec<Vec<usize>> = prefs.into_iter().map(|s| s.into_iter().collect()).collect();
        let problem = HatAssignment::new(&prefs).unwrap();
        prop_assert_eq!(problem.count().unwrap(), brute_hats(&prefs, prefs.len()));
        if k <= prefs.len() {
            let partial = problem.with_coverage(Coverage::AtLeast(k)).unwrap();
            prop_assert_eq!(partial.count().unwrap(), brute_hats(&prefs, k));
        }
    }

    #[test]
    fn hat_assignment_witness_is_valid(
        prefs in prop::collection::vec(prop::collection::btree_set(0usize..6, 1..4), 1..5),
    ) {
        let prefs: Vec<Vec<usize>> = prefs.into_iter().map(|s| s.into_iter().collect()).collect();
        let problem = HatAssignment::new(&prefs).unwrap();
        match problem.assignment().unwrap() {
            None => prop_assert_eq!(problem.count().unwrap(), 0),
            Some(fittings) => {
                prop_assert_eq!(fittings.len(), prefs.len());
                let mut hats: Vec<usize> = fittings.iter().map(|f| f.hat).collect();
                hats.sort_unstable();
                hats.dedup();
                prop_assert_eq!(hats.len(), prefs.len());
                for f in &fittings {
                    prop_assert!(prefs[f.person].contains(&f.hat));
                }
            }
        }
    }

    #[test]
    fn good_subsets_match_enumeration(nums in prop::collection::vec(1u32..=30, 0..11)) {
        let problem = GoodSubsets::new(&nums).unwrap();
        prop_assert_eq!(problem.count().unwrap(), brute_good_subsets(&nums));
    }

    #[test]
    fn equal_partition_matches_enumeration(
        weights in prop::collection::vec(1i64..8, 1..8),
        k in 1usize..5,
    ) {
        let problem = EqualPartition::new(&weights, k).unwrap();
        let expected = brute_equal_partition(&weights, k);
        prop_assert_eq!(problem.is_feasible().unwrap(), expected);
        if let Some(groups) = problem.groups().unwrap() {
            prop_assert_eq!(groups.len(), k);
            let mut items: Vec<usize> = groups.concat();
            items.sort_unstable();
            prop_assert_eq!(items, (0..weights.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn bin_count_matches_enumeration(
        weights in prop::collection::vec(0i64..10, 0..8),
        capacity in 1i64..15,
    ) {
        let problem = MinCostPartition::with_capacity(&weights, capacity).unwrap();
        prop_assert_eq!(problem.min_cost().unwrap(), brute_bins(&weights, capacity));
        if let Some(best) = problem.solve().unwrap() {
            prop_assert_eq!(best.groups.len() as i64, best.cost);
            for group in best.members() {
                prop_assert!(group.iter().map(|&i| weights[i]).sum::<i64>() <= capacity);
            }
        }
    }

    #[test]
    fn distribution_matches_enumeration(
        stock in prop::collection::vec((0i64..6, 1i64..6), 0..5),
        quantity in prop::collection::vec(1i64..5, 0..5),
        k in 0usize..5,
    ) {
        let mut merged: Vec<(i64, i64)> = Vec::new();
        for (v, c) in stock {
            match merged.iter_mut().find(|(w, _)| *w == v) {
                Some(entry) => entry.1 += c,
                None => merged.push((v, c)),
            }
        }
        let problem = Distribution::from_counts(merged.clone(), &quantity).unwrap();
        prop_assert_eq!(
            problem.is_possible().unwrap(),
            brute_distribute(&merged, &quantity, quantity.len())
        );
        if k <= quantity.len() {
            let partial = problem.with_coverage(Coverage::AtLeast(k)).unwrap();
            prop_assert_eq!(
                partial.is_possible().unwrap(),
                brute_distribute(&merged, &quantity, k)
            );
        }
    }

    #[test]
    fn transfers_match_enumeration(raw in prop::collection::vec(-6i64..7, 1..8)) {
        let mut balances = raw;
        let total: i64 = balances.iter().sum();
        balances.push(-total);
        let problem = AccountBalance::from_balances(&balances).unwrap();
        prop_assert_eq!(problem.min_transfers().unwrap(), brute_transfers(&balances));
        let plan = problem.settlement().unwrap();
        prop_assert_eq!(plan.len(), problem.min_transfers().unwrap());
        let mut net = balances.clone();
        for t in &plan {
            prop_assert!(t.amount > 0);
            net[t.from] += t.amount;
            net[t.to] -= t.amount;
        }
        prop_assert!(net.iter().all(|&b| b == 0));
    }

    #[test]
    fn game_matches_minimax(max_choice in 1u32..8, target in -2i64..30) {
        let game = CanIWin::new(max_choice, target).unwrap();
        let expected = brute_game(max_choice, target);
        prop_assert_eq!(game.first_player_wins().unwrap(), expected);
        if let Some(first) = game.winning_move().unwrap() {
            let after = 1u32 << first;
            let total = i64::from(first);
            prop_assert!(total >= target || !brute_game_from(after, total, max_choice, target));
        }
    }

    #[test]
    fn sos_matches_definition(values in prop::collection::vec(-1000i64..1000, 1..6usize).prop_map(|v| {
        let len = 1usize << (v.len() - 1);
        (0..len).map(|i| v[i % v.len()] * (i as i64 + 1)).collect::<Vec<_>>()
    })) {
        let subs = sum_over_subsets(&values).unwrap();
        let sups = sum_over_supersets(&values).unwrap();
        for mask in 0..values.len() {
            let below: i64 = (0..values.len()).filter(|s| s & mask == *s).map(|s| values[s]).sum();
            let above: i64 = (0..values.len()).filter(|s| s & mask == mask).map(|s| values[s]).sum();
            prop_assert_eq!(subs[mask], below);
            prop_assert_eq!(sups[mask], above);
        }
        prop_assert_eq!(mobius_subsets(&subs).unwrap(), values);
    }
}
