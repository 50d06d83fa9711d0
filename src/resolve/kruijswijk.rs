//! Kruijswijk guess-and-check resolution algorithm.
//!
//! Each order is adjudicated on demand. When the adjudication of an order
//! comes back round to itself, the order is resolved under both possible
//! guesses: if both agree the result is unique, otherwise the dependency
//! cycle is settled by the backup rule (circular movement succeeds, convoy
//! paradoxes fail the convoyed moves).
//!
//! Input orders must already be validated: one order per unit, every unit
//! ordered, moves adjacent unless flagged as convoyed.

use crate::board::{Board, Coast, Order, PowerId, ProvinceId, Unit};

/// The raw adjudication of an order, before it is reported to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderResult {
    Succeeded,
    /// A move that lost to a defender, a standoff or a head-to-head battle.
    Bounced,
    /// A convoyed move with no chain of surviving convoys.
    NoConvoyPath,
    /// A support that was cut or whose supporter was dislodged.
    Cut,
    /// A support or convoy whose target unit did something else.
    Void,
    /// A convoy whose fleet was dislodged.
    Disrupted,
}

/// A resolved order paired with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedOrder {
    pub order: Order,
    pub power: PowerId,
    pub result: OrderResult,
    /// The ordered unit was dislodged, whatever its own order did.
    pub dislodged: bool,
}

/// A unit that was dislodged during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dislodgement {
    pub unit: Unit,
    pub attacker_from: ProvinceId,
    pub by_convoy: bool,
}

/// Resolution state for the guess-and-check algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResState {
    Unresolved,
    Guessing,
    Resolved,
}

/// Internal tracking for a single order during adjudication.
#[derive(Debug, Clone, Copy)]
struct AdjResult {
    order: Order,
    power: PowerId,
    state: ResState,
    resolution: bool,
    prov: ProvinceId,
    /// For moves: the destination province.
    target: Option<ProvinceId>,
    /// For support: province of the supported unit.
    /// For convoy: province of the convoyed army.
    aux_loc: Option<ProvinceId>,
    /// For support-move: destination of the supported move.
    /// For convoy: destination of the convoyed army.
    aux_target: Option<ProvinceId>,
    convoyed: bool,
}

impl AdjResult {
    fn is_move(&self) -> bool {
        matches!(self.order, Order::Move { .. })
    }

    fn is_convoy(&self) -> bool {
        matches!(self.order, Order::Convoy { .. })
    }
}

/// Reusable resolver that minimizes allocations across repeated calls.
///
/// Allocate once and call `resolve()` on each set of orders. The lookup
/// table, order buffer and dependency list are reused.
pub struct Resolver {
    lookup: Vec<Option<usize>>,
    adj_buf: Vec<AdjResult>,
    deps: Vec<usize>,
}

impl Resolver {
    /// Creates a new resolver with the given initial capacity hint.
    pub fn new(capacity: usize) -> Self {
        Resolver {
            lookup: Vec::new(),
            adj_buf: Vec::with_capacity(capacity),
            deps: Vec::new(),
        }
    }

    /// Resolves a set of validated movement-phase orders.
    ///
    /// Each `(Order, PowerId)` pair is an order issued by the given power.
    /// Returns the resolved orders in input order, and any dislodged units.
    pub fn resolve(
        &mut self,
        orders: &[(Order, PowerId)],
        board: &Board,
    ) -> (Vec<ResolvedOrder>, Vec<Dislodgement>) {
        self.init(orders, board.province_count());
        for i in 0..self.adj_buf.len() {
            self.adjudicate(i, board);
        }
        self.build_results(board)
    }

    fn init(&mut self, orders: &[(Order, PowerId)], province_count: usize) {
        self.adj_buf.clear();
        self.deps.clear();
        self.lookup.clear();
        self.lookup.resize(province_count, None);

        for &(order, power) in orders {
            let Some(ar) = new_entry(order, power) else {
                continue;
            };
            self.lookup[ar.prov.index()] = Some(self.adj_buf.len());
            self.adj_buf.push(ar);
        }
    }

    fn order_at(&self, prov: ProvinceId) -> Option<usize> {
        self.lookup.get(prov.index()).copied().flatten()
    }

    /// Returns the order of the unit this move meets head-on, if any.
    ///
    /// Convoyed moves never take part in head-to-head battles.
    fn head_to_head(&self, i: usize) -> Option<usize> {
        let ar = self.adj_buf[i];
        if !ar.is_move() || ar.convoyed {
            return None;
        }
        let j = self.order_at(ar.target?)?;
        let opp = self.adj_buf[j];
        (opp.is_move() && !opp.convoyed && opp.target == Some(ar.prov)).then_some(j)
    }

    /// Adjudicates order `i`, guessing when a dependency cycle is met.
    fn adjudicate(&mut self, i: usize, board: &Board) -> bool {
        match self.adj_buf[i].state {
            ResState::Resolved => return self.adj_buf[i].resolution,
            ResState::Guessing => {
                if !self.deps.contains(&i) {
                    self.deps.push(i);
                }
                return self.adj_buf[i].resolution;
            }
            ResState::Unresolved => {}
        }

        let old_count = self.deps.len();

        // First guess: the order fails.
        self.adj_buf[i].state = ResState::Guessing;
        self.adj_buf[i].resolution = false;
        let first = self.resolve_order(i, board);

        if self.deps.len() == old_count {
            // No dependency on any guess.
            if self.adj_buf[i].state != ResState::Resolved {
                self.settle(i, first);
            }
            return self.adj_buf[i].resolution;
        }

        if self.deps[old_count] != i {
            // Depends on a guess made further up; let that order decide.
            self.deps.push(i);
            self.adj_buf[i].resolution = first;
            return first;
        }

        // Depends on its own guess: try the other one.
        self.reset_deps(old_count);
        self.adj_buf[i].state = ResState::Guessing;
        self.adj_buf[i].resolution = true;
        let second = self.resolve_order(i, board);

        if first == second {
            self.reset_deps(old_count);
            self.settle(i, first);
            return first;
        }

        // Zero or two consistent resolutions.
        self.backup_rule(old_count);
        self.adjudicate(i, board)
    }

    fn settle(&mut self, i: usize, resolution: bool) {
        self.adj_buf[i].state = ResState::Resolved;
        self.adj_buf[i].resolution = resolution;
    }

    fn reset_deps(&mut self, from: usize) {
        for k in from..self.deps.len() {
            let j = self.deps[k];
            self.adj_buf[j].state = ResState::Unresolved;
        }
        self.deps.truncate(from);
    }

    /// Settles a cycle with no unique resolution.
    ///
    /// A cycle made only of moves is circular movement and every move
    /// succeeds. Anything else is a convoy paradox: the convoyed moves in
    /// the cycle fail, or failing that the convoys themselves.
    fn backup_rule(&mut self, from: usize) {
        let cycle: Vec<usize> = self.deps.drain(from..).collect();

        if cycle.iter().all(|&j| self.adj_buf[j].is_move()) {
            for &j in &cycle {
                self.settle(j, true);
            }
            return;
        }

        let mut settled = false;
        for &j in &cycle {
            if self.adj_buf[j].convoyed {
                self.settle(j, false);
                settled = true;
            }
        }
        if !settled {
            for &j in &cycle {
                if self.adj_buf[j].is_convoy() {
                    self.settle(j, false);
                    settled = true;
                }
            }
        }
        for &j in &cycle {
            if !settled {
                self.settle(j, false);
            } else if self.adj_buf[j].state != ResState::Resolved {
                self.adj_buf[j].state = ResState::Unresolved;
            }
        }
    }

    fn resolve_order(&mut self, i: usize, board: &Board) -> bool {
        match self.adj_buf[i].order {
            Order::Move { .. } => self.resolve_move(i, board),
            Order::SupportHold { .. } | Order::SupportMove { .. } => self.resolve_support(i, board),
            Order::Convoy { .. } => self.resolve_convoy(i, board),
            _ => true,
        }
    }

    /// Determines if a move order succeeds.
    fn resolve_move(&mut self, i: usize, board: &Board) -> bool {
        let ar = self.adj_buf[i];
        let Some(target) = ar.target else {
            return false;
        };

        if ar.convoyed && !self.has_convoy_path(i, board) {
            return false;
        }

        let attack = self.attack_strength(i, board);

        match self.head_to_head(i) {
            Some(opp) => {
                if attack <= self.defend_strength(opp, board) {
                    return false;
                }
            }
            None => {
                if attack <= self.hold_strength(target, board) {
                    return false;
                }
            }
        }

        // Every other move into the same province must be outweighed.
        for j in 0..self.adj_buf.len() {
            let other = self.adj_buf[j];
            if j == i || !other.is_move() || other.target != Some(target) {
                continue;
            }
            if attack <= self.prevent_strength(j, board) {
                return false;
            }
        }

        true
    }

    /// Determines if support is given (not cut and supporter not dislodged).
    fn resolve_support(&mut self, i: usize, board: &Board) -> bool {
        let ar = self.adj_buf[i];
        let against = match ar.order {
            Order::SupportMove { dest, .. } => Some(dest.province),
            _ => None,
        };

        for j in 0..self.adj_buf.len() {
            let other = self.adj_buf[j];
            if !other.is_move() || other.target != Some(ar.prov) {
                continue;
            }

            // Support cannot be cut by a unit of the same power.
            if other.power == ar.power {
                continue;
            }

            // The unit being supported against only cuts by dislodging.
            if against == Some(other.prov) {
                if self.adjudicate(j, board) {
                    return false;
                }
                continue;
            }

            // A convoyed attack needs a surviving convoy to cut.
            if other.convoyed && !self.has_convoy_path(j, board) {
                continue;
            }

            return false;
        }

        true
    }

    /// Determines if a convoy order survives (fleet is not dislodged).
    fn resolve_convoy(&mut self, i: usize, board: &Board) -> bool {
        let prov = self.adj_buf[i].prov;
        for j in 0..self.adj_buf.len() {
            let other = self.adj_buf[j];
            if other.is_move() && other.target == Some(prov) && self.adjudicate(j, board) {
                return false;
            }
        }
        true
    }

    /// Counts successful supports for move `i`, ignoring supports given by
    /// `excluded`.
    fn move_supports(&mut self, i: usize, excluded: Option<PowerId>, board: &Board) -> i32 {
        let ar = self.adj_buf[i];
        let mut strength = 0;
        for k in 0..self.adj_buf.len() {
            let other = self.adj_buf[k];
            if !matches!(other.order, Order::SupportMove { .. }) {
                continue;
            }
            if other.aux_loc != Some(ar.prov) || other.aux_target != ar.target {
                continue;
            }
            if excluded == Some(other.power) {
                continue;
            }
            if self.adjudicate(k, board) {
                strength += 1;
            }
        }
        strength
    }

    /// Computes the attack strength of a move order.
    fn attack_strength(&mut self, i: usize, board: &Board) -> i32 {
        let ar = self.adj_buf[i];
        let Some(target) = ar.target else {
            return 0;
        };
        if ar.convoyed && !self.has_convoy_path(i, board) {
            return 0;
        }

        let defender = match self.order_at(target) {
            None => None,
            Some(j) => {
                let d = self.adj_buf[j];
                let moved_away =
                    d.is_move() && self.head_to_head(i) != Some(j) && self.adjudicate(j, board);
                if moved_away {
                    None
                } else {
                    Some(d.power)
                }
            }
        };

        // No self-dislodgement, and no help dislodging a supporter's own unit.
        if defender == Some(ar.power) {
            return 0;
        }
        1 + self.move_supports(i, defender, board)
    }

    /// Computes the hold strength of a province.
    fn hold_strength(&mut self, prov: ProvinceId, board: &Board) -> i32 {
        let Some(j) = self.order_at(prov) else {
            return 0;
        };

        // A moving unit holds only if its move fails.
        if self.adj_buf[j].is_move() {
            return if self.adjudicate(j, board) { 0 } else { 1 };
        }

        let mut strength = 1;
        for k in 0..self.adj_buf.len() {
            let other = self.adj_buf[k];
            if !matches!(other.order, Order::SupportHold { .. }) || other.aux_loc != Some(prov) {
                continue;
            }
            if self.adjudicate(k, board) {
                strength += 1;
            }
        }
        strength
    }

    /// Computes the defend strength of a move in a head-to-head battle.
    fn defend_strength(&mut self, i: usize, board: &Board) -> i32 {
        1 + self.move_supports(i, None, board)
    }

    /// Computes the prevent strength of a move order.
    fn prevent_strength(&mut self, i: usize, board: &Board) -> i32 {
        let ar = self.adj_buf[i];
        if ar.convoyed && !self.has_convoy_path(i, board) {
            return 0;
        }

        // A unit beaten in a head-to-head battle prevents nothing.
        if let Some(opp) = self.head_to_head(i) {
            if self.adjudicate(opp, board) {
                return 0;
            }
        }

        1 + self.move_supports(i, None, board)
    }

    /// Returns true if a convoy matches move `i` and may carry it.
    fn carries(&self, convoy: &AdjResult, ar: &AdjResult) -> bool {
        convoy.is_convoy() && convoy.aux_loc == Some(ar.prov) && convoy.aux_target == ar.target
    }

    /// Checks if there's a chain of surviving convoys for move `i`.
    fn has_convoy_path(&mut self, i: usize, board: &Board) -> bool {
        let ar = self.adj_buf[i];
        let Some(dst) = ar.target else {
            return false;
        };
        let adjacency = board.adjacency();

        let mut visited = vec![false; self.adj_buf.len()];
        let mut queue = Vec::new();

        // Convoys adjacent to the army's province.
        for k in 0..self.adj_buf.len() {
            let convoy = self.adj_buf[k];
            if !self.carries(&convoy, &ar) {
                continue;
            }
            if adjacency.is_adjacent(ar.prov, Coast::None, convoy.prov, Coast::None, true)
                && self.adjudicate(k, board)
            {
                visited[k] = true;
                queue.push(k);
            }
        }

        let mut head = 0;
        while head < queue.len() {
            let current = self.adj_buf[queue[head]].prov;
            head += 1;

            if adjacency.is_adjacent(current, Coast::None, dst, Coast::None, true) {
                return true;
            }

            for k in 0..self.adj_buf.len() {
                let convoy = self.adj_buf[k];
                if visited[k] || !self.carries(&convoy, &ar) {
                    continue;
                }
                if adjacency.is_adjacent(current, Coast::None, convoy.prov, Coast::None, true)
                    && self.adjudicate(k, board)
                {
                    visited[k] = true;
                    queue.push(k);
                }
            }
        }

        false
    }

    /// Returns true if a support or convoy order matches what its target unit
    /// was actually ordered to do.
    fn matches_target(&self, ar: &AdjResult) -> bool {
        let target = ar.aux_loc.and_then(|p| self.order_at(p)).map(|j| self.adj_buf[j]);
        match (ar.order, target) {
            (Order::SupportHold { .. }, Some(t)) => !t.is_move(),
            (Order::SupportMove { .. }, Some(t)) => t.is_move() && t.target == ar.aux_target,
            (Order::Convoy { .. }, Some(t)) => t.convoyed && t.target == ar.aux_target,
            (Order::SupportHold { .. } | Order::SupportMove { .. } | Order::Convoy { .. }, None) => false,
            _ => true,
        }
    }

    /// Converts internal adjudication state to the external result format.
    fn build_results(&mut self, board: &Board) -> (Vec<ResolvedOrder>, Vec<Dislodgement>) {
        let mut results = Vec::with_capacity(self.adj_buf.len());
        let mut dislodged = Vec::new();

        // Successful move into each province: (source, convoyed).
        let mut moved_in: Vec<Option<(ProvinceId, bool)>> = vec![None; self.lookup.len()];
        for ar in &self.adj_buf {
            if let (true, true, Some(t)) = (ar.is_move(), ar.resolution, ar.target) {
                moved_in[t.index()] = Some((ar.prov, ar.convoyed));
            }
        }

        for i in 0..self.adj_buf.len() {
            let ar = self.adj_buf[i];

            let result = match ar.order {
                Order::Move { .. } => {
                    if ar.resolution {
                        OrderResult::Succeeded
                    } else if ar.convoyed && !self.has_convoy_path(i, board) {
                        OrderResult::NoConvoyPath
                    } else {
                        OrderResult::Bounced
                    }
                }
                Order::SupportHold { .. } | Order::SupportMove { .. } => {
                    if !self.matches_target(&ar) {
                        OrderResult::Void
                    } else if ar.resolution {
                        OrderResult::Succeeded
                    } else {
                        OrderResult::Cut
                    }
                }
                Order::Convoy { .. } => {
                    if !self.matches_target(&ar) {
                        OrderResult::Void
                    } else if ar.resolution {
                        OrderResult::Succeeded
                    } else {
                        OrderResult::Disrupted
                    }
                }
                _ => OrderResult::Succeeded,
            };

            let moved_away = ar.is_move() && ar.resolution;
            let mut was_dislodged = false;
            if let (false, Some((from, by_convoy))) = (moved_away, moved_in[ar.prov.index()]) {
                if let Some(unit) = ar.order.unit() {
                    was_dislodged = true;
                    dislodged.push(Dislodgement {
                        unit: Unit {
                            unit_type: unit.unit_type,
                            power: ar.power,
                            province: ar.prov,
                            coast: unit.location.coast,
                        },
                        attacker_from: from,
                        by_convoy,
                    });
                }
            }

            results.push(ResolvedOrder {
                order: ar.order,
                power: ar.power,
                result,
                dislodged: was_dislodged,
            });
        }

        (results, dislodged)
    }
}

/// Builds the adjudication entry for an order.
fn new_entry(order: Order, power: PowerId) -> Option<AdjResult> {
    let prov = order.province()?;
    let (target, aux_loc, aux_target, convoyed) = match order {
        Order::Move { dest, via_convoy, .. } => (Some(dest.province), None, None, via_convoy),
        Order::SupportHold { supported, .. } => (None, Some(supported.location.province), None, false),
        Order::SupportMove { supported, dest, .. } => (
            None,
            Some(supported.location.province),
            Some(dest.province),
            false,
        ),
        Order::Convoy { convoyed_from, convoyed_to, .. } => (
            None,
            Some(convoyed_from.province),
            Some(convoyed_to.province),
            false,
        ),
        _ => (None, None, None, false),
    };
    Some(AdjResult {
        order,
        power,
        state: ResState::Unresolved,
        resolution: false,
        prov,
        target,
        aux_loc,
        aux_target,
        convoyed,
    })
}

/// Convenience function that creates a resolver, resolves, and returns results.
pub fn resolve_orders(
    orders: &[(Order, PowerId)],
    board: &Board,
) -> (Vec<ResolvedOrder>, Vec<Dislodgement>) {
    let mut resolver = Resolver::new(orders.len());
    resolver.resolve(orders, board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{load_variant, Location, OrderUnit, UnitType};

    struct Fixture {
        board: Board,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture { board: load_variant("standard").unwrap() }
        }

        fn p(&self, abbr: &str) -> ProvinceId {
            self.board.province(abbr).unwrap()
        }

        fn power(&self, name: &str) -> PowerId {
            self.board.power(name).unwrap()
        }

        fn army(&self, abbr: &str) -> OrderUnit {
            OrderUnit::army(self.p(abbr))
        }

        fn fleet(&self, abbr: &str) -> OrderUnit {
            OrderUnit { unit_type: UnitType::Fleet, location: Location::new(self.p(abbr)) }
        }

        fn mv(&self, unit: OrderUnit, dest: &str) -> Order {
            Order::Move { unit, dest: Location::new(self.p(dest)), via_convoy: false }
        }
    }

    fn result_for(results: &[ResolvedOrder], province: ProvinceId) -> OrderResult {
        results
            .iter()
            .find(|r| r.order.province() == Some(province))
            .map(|r| r.result)
            .unwrap_or_else(|| panic!("No result found for {:?}", province))
    }

    fn dislodged_at(results: &[ResolvedOrder], province: ProvinceId) -> bool {
        results
            .iter()
            .any(|r| r.order.province() == Some(province) && r.dislodged)
    }

    #[test]
    fn hold_succeeds() {
        let f = Fixture::new();
        let orders = vec![(Order::Hold { unit: f.army("vie") }, f.power("austria"))];
        let (results, dislodged) = resolve_orders(&orders, &f.board);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].result, OrderResult::Succeeded);
        assert!(dislodged.is_empty());
    }

    #[test]
    fn move_bounces_against_hold() {
        let f = Fixture::new();
        let orders = vec![
            (f.mv(f.army("vie"), "bud"), f.power("austria")),
            (Order::Hold { unit: f.army("bud") }, f.power("russia")),
        ];
        let (results, _) = resolve_orders(&orders, &f.board);
        assert_eq!(result_for(&results, f.p("vie")), OrderResult::Bounced);
        assert_eq!(result_for(&results, f.p("bud")), OrderResult::Succeeded);
    }

    #[test]
    fn supported_attack_dislodges() {
        let f = Fixture::new();
        let austria = f.power("austria");
        let orders = vec![
            (
                Order::SupportMove {
                    unit: f.army("tri"),
                    supported: f.army("tyr"),
                    dest: Location::new(f.p("ven")),
                },
                austria,
            ),
            (f.mv(f.army("tyr"), "ven"), austria),
            (Order::Hold { unit: f.army("ven") }, f.power("italy")),
        ];
        let (results, dislodged) = resolve_orders(&orders, &f.board);
        assert_eq!(result_for(&results, f.p("tyr")), OrderResult::Succeeded);
        assert!(dislodged_at(&results, f.p("ven")));
        assert_eq!(dislodged.len(), 1);
        assert_eq!(dislodged[0].unit.province, f.p("ven"));
        assert_eq!(dislodged[0].attacker_from, f.p("tyr"));
        assert!(!dislodged[0].by_convoy);
    }

    #[test]
    fn three_unit_rotation_succeeds() {
        let f = Fixture::new();
        let turkey = f.power("turkey");
        let orders = vec![
            (f.mv(f.fleet("ank"), "con"), turkey),
            (f.mv(f.army("con"), "smy"), turkey),
            (f.mv(f.army("smy"), "ank"), turkey),
        ];
        let (results, dislodged) = resolve_orders(&orders, &f.board);
        for abbr in ["ank", "con", "smy"] {
            assert_eq!(result_for(&results, f.p(abbr)), OrderResult::Succeeded);
        }
        assert!(dislodged.is_empty());
    }

    #[test]
    fn head_to_head_without_support_bounces() {
        let f = Fixture::new();
        let orders = vec![
            (f.mv(f.army("vie"), "bud"), f.power("austria")),
            (f.mv(f.army("bud"), "vie"), f.power("russia")),
        ];
        let (results, _) = resolve_orders(&orders, &f.board);
        assert_eq!(result_for(&results, f.p("vie")), OrderResult::Bounced);
        assert_eq!(result_for(&results, f.p("bud")), OrderResult::Bounced);
    }

    #[test]
    fn void_support_reported() {
        let f = Fixture::new();
        let austria = f.power("austria");
        let orders = vec![
            (
                Order::SupportHold { unit: f.army("vie"), supported: f.army("bud") },
                austria,
            ),
            (f.mv(f.army("bud"), "rum"), austria),
        ];
        let (results, _) = resolve_orders(&orders, &f.board);
        assert_eq!(result_for(&results, f.p("vie")), OrderResult::Void);
    }

    #[test]
    fn convoyed_army_without_fleet_has_no_path() {
        let f = Fixture::new();
        let orders = vec![(
            Order::Move {
                unit: f.army("lon"),
                dest: Location::new(f.p("nwy")),
                via_convoy: true,
            },
            f.power("england"),
        )];
        let (results, _) = resolve_orders(&orders, &f.board);
        assert_eq!(result_for(&results, f.p("lon")), OrderResult::NoConvoyPath);
    }

    #[test]
    fn convoy_swap_is_not_head_to_head() {
        let f = Fixture::new();
        let england = f.power("england");
        let orders = vec![
            (
                Order::Move {
                    unit: f.army("lon"),
                    dest: Location::new(f.p("yor")),
                    via_convoy: true,
                },
                england,
            ),
            (
                Order::Convoy {
                    unit: f.fleet("nth"),
                    convoyed_from: Location::new(f.p("lon")),
                    convoyed_to: Location::new(f.p("yor")),
                },
                england,
            ),
            (f.mv(f.army("yor"), "lon"), england),
        ];
        let (results, dislodged) = resolve_orders(&orders, &f.board);
        assert_eq!(result_for(&results, f.p("lon")), OrderResult::Succeeded);
        assert_eq!(result_for(&results, f.p("yor")), OrderResult::Succeeded);
        assert!(dislodged.is_empty());
    }
}
