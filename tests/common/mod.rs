//! Shared fixtures for the integration suites.
//!
//! Orders are written in the compact notation used in results:
//! `A vie H`, `A vie - bud`, `A lon - nwy via C`, `A tyr S A vie`,
//! `A gal S A bud - rum`, `F nth C A lon - nwy`, `A vie R boh`, `F tri D`,
//! `F stp/sc B`, `W`.

#![allow(dead_code)]

use adjudicator::board::{load_variant, Board, Ledger, Location, Order, OrderUnit, PowerId, ProvinceId, Unit, UnitType};
use adjudicator::resolve::{
    resolve_adjustment, resolve_movement, resolve_retreats, AdjustmentResolution, MovementResolution, OrderOutcome,
    RetreatResolution, TurnResult,
};
use adjudicator::DisbandTieBreak;

pub fn standard() -> Board {
    load_variant("standard").unwrap()
}

fn unit_type(kind: &str) -> UnitType {
    match kind {
        "A" => UnitType::Army,
        "F" => UnitType::Fleet,
        other => panic!("bad unit type: {other}"),
    }
}

fn loc(board: &Board, spec: &str) -> Location {
    board.location(spec).unwrap_or_else(|| panic!("bad location: {spec}"))
}

fn order_unit(board: &Board, kind: &str, at: &str) -> OrderUnit {
    OrderUnit { unit_type: unit_type(kind), location: loc(board, at) }
}

/// Parses one order in compact notation.
pub fn parse_order(board: &Board, text: &str) -> Order {
    let t: Vec<&str> = text.split_whitespace().collect();
    if t == ["W"] {
        return Order::Waive;
    }
    let unit = order_unit(board, t[0], t[1]);
    match &t[2..] {
        ["H"] => Order::Hold { unit },
        ["-", dest] => Order::Move { unit, dest: loc(board, dest), via_convoy: false },
        ["-", dest, "via", "C"] => Order::Move { unit, dest: loc(board, dest), via_convoy: true },
        ["S", kind, at] | ["S", kind, at, "H"] => Order::SupportHold {
            unit,
            supported: order_unit(board, kind, at),
        },
        ["S", kind, at, "-", dest] => Order::SupportMove {
            unit,
            supported: order_unit(board, kind, at),
            dest: loc(board, dest),
        },
        ["C", "A", from, "-", to] => Order::Convoy {
            unit,
            convoyed_from: loc(board, from),
            convoyed_to: loc(board, to),
        },
        ["R", dest] => Order::Retreat { unit, dest: loc(board, dest) },
        ["D"] => Order::Destroy { unit },
        ["B"] => Order::Build { unit },
        _ => panic!("bad order: {text}"),
    }
}

/// Builds a unit given as `A vie` or `F stp/sc`.
pub fn make_unit(board: &Board, power: PowerId, text: &str) -> Unit {
    let t: Vec<&str> = text.split_whitespace().collect();
    let at = loc(board, t[1]);
    Unit { unit_type: unit_type(t[0]), power, province: at.province, coast: at.coast }
}

/// A position under test on the standard map, starting empty.
pub struct Datc {
    pub board: Board,
    pub ledger: Ledger,
    pub orders: Vec<(Order, PowerId)>,
    pub after: Option<MovementResolution>,
}

impl Datc {
    pub fn new() -> Self {
        let board = standard();
        let ledger = Ledger::empty(&board);
        Datc { board, ledger, orders: Vec::new(), after: None }
    }

    pub fn power(&self, name: &str) -> PowerId {
        self.board.power(name).unwrap_or_else(|| panic!("bad power: {name}"))
    }

    pub fn p(&self, abbr: &str) -> ProvinceId {
        self.board.province(abbr).unwrap_or_else(|| panic!("bad province: {abbr}"))
    }

    /// Places a unit given as `A vie` or `F stp/sc`.
    pub fn unit(&mut self, power: &str, text: &str) {
        let unit = make_unit(&self.board, self.power(power), text);
        assert!(self.ledger.place_unit(unit), "{text} placed twice");
    }

    /// Places the ordered unit if the square is empty, then submits the order.
    pub fn order(&mut self, power: &str, text: &str) {
        let t: Vec<&str> = text.split_whitespace().collect();
        if self.ledger.unit_at(self.p(t[1].split('/').next().unwrap_or(t[1]))).is_none() {
            self.unit(power, &format!("{} {}", t[0], t[1]));
        }
        self.submit(power, text);
    }

    /// Submits an order without touching the board.
    pub fn submit(&mut self, power: &str, text: &str) {
        let order = parse_order(&self.board, text);
        let power = self.power(power);
        self.orders.push((order, power));
    }

    /// Controls the given centers for `power`.
    pub fn control(&mut self, power: &str, abbrs: &[&str]) {
        let power = self.power(power);
        for a in abbrs {
            let p = self.p(a);
            self.ledger.set_controller(p, Some(power));
        }
    }

    pub fn resolve(&mut self) {
        self.after = Some(resolve_movement(&self.board, &self.ledger, &self.orders));
    }

    pub fn results(&self) -> &[TurnResult] {
        &self.after.as_ref().expect("resolve first").results
    }

    pub fn after(&self) -> &Ledger {
        &self.after.as_ref().expect("resolve first").ledger
    }

    /// Outcome of the order the unit at `abbr` actually carried out.
    pub fn outcome(&self, abbr: &str) -> OrderOutcome {
        let p = self.p(abbr);
        self.results()
            .iter()
            .find(|r| r.order.province() == Some(p) && r.outcome != OrderOutcome::Illegal)
            .map(|r| r.outcome)
            .unwrap_or_else(|| panic!("no result for {abbr}"))
    }

    /// True if an order for the unit at `abbr` was rejected.
    pub fn rejected(&self, abbr: &str) -> bool {
        let p = self.p(abbr);
        self.results()
            .iter()
            .any(|r| r.order.province() == Some(p) && r.outcome == OrderOutcome::Illegal)
    }

    pub fn dislodged(&self, abbr: &str) -> bool {
        self.after().dislodged[self.p(abbr).index()].is_some()
    }

    /// Power and type of the unit standing at `abbr` after resolution.
    pub fn occupant(&self, abbr: &str) -> Option<(String, UnitType)> {
        self.after()
            .unit_at(self.p(abbr))
            .map(|u| (self.board.power_name(u.power).to_string(), u.unit_type))
    }

    /// Legal retreats of the unit dislodged at `abbr`.
    pub fn retreats(&self, abbr: &str) -> Vec<String> {
        let d = self.after().dislodged[self.p(abbr).index()]
            .as_ref()
            .unwrap_or_else(|| panic!("{abbr} not dislodged"));
        d.retreats.iter().map(|l| self.board.location_name(*l)).collect()
    }

    /// Runs a retreat phase on the resolved position.
    pub fn retreat_phase(&self, orders: &[(&str, &str)]) -> RetreatResolution {
        let orders: Vec<(Order, PowerId)> = orders
            .iter()
            .map(|(power, text)| (parse_order(&self.board, text), self.power(power)))
            .collect();
        resolve_retreats(&self.board, self.after(), &orders)
    }

    /// Runs an adjustment phase on the unresolved position.
    pub fn adjustment_phase(&self, orders: &[(&str, &str)], tie_break: DisbandTieBreak) -> AdjustmentResolution {
        let orders: Vec<(Order, PowerId)> = orders
            .iter()
            .map(|(power, text)| (parse_order(&self.board, text), self.power(power)))
            .collect();
        resolve_adjustment(&self.board, &self.ledger, &orders, tie_break)
    }
}
