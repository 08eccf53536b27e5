//! Interval analysis of a counting loop:
//!
//! ```text
//! L0: x = 0;
//! L1: while (x < bound) { x++; if (x == error) goto ERR; }
//! L2: return;
//! ERR: fail;
//! ```

use clap::Parser;

use cpa_rs::prelude::*;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Loop bound.
    #[arg(value_name = "INT", default_value = "10")]
    bound: i64,

    /// Waitlist order: bfs, dfs or topological.
    #[clap(long, value_name = "ORDER", default_value = "bfs")]
    order: TraversalOrder,

    /// Value of `x` that jumps to the error location.
    #[clap(long, value_name = "INT")]
    error: Option<i64>,

    /// Merge states at the same location by interval join.
    #[clap(long)]
    join: bool,

    /// Keep exploring after the first error location is reached.
    #[clap(long)]
    all_errors: bool,
}

const ERR: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Interval {
    loc: u32,
    lo: i64,
    hi: i64,
}

impl AbstractState for Interval {
    type Location = u32;

    fn location(&self) -> u32 {
        self.loc
    }

    fn is_target(&self) -> bool {
        self.loc == ERR
    }

    fn topological_rank(&self) -> usize {
        self.loc as usize
    }
}

#[derive(Debug, Clone)]
struct Intervals;

impl PartialOrder for Intervals {
    type Element = Interval;

    fn le(&self, a: &Interval, b: &Interval) -> bool {
        a.loc == b.loc && b.lo <= a.lo && a.hi <= b.hi
    }
}

impl AbstractDomain for Intervals {
    fn join(&self, a: &Interval, b: &Interval) -> Interval {
        Interval {
            loc: a.loc,
            lo: a.lo.min(b.lo),
            hi: a.hi.max(b.hi),
        }
    }
}

struct Program {
    bound: i64,
    error: Option<i64>,
}

impl TransferRelation<Interval, ()> for Program {
    fn abstract_successors(&self, s: &Interval, _: &()) -> Result<Vec<(Interval, ())>> {
        let at = |loc, lo, hi| (Interval { loc, lo, hi }, ());
        let mut successors = Vec::new();

        match s.loc {
            0 => successors.push(at(1, 0, 0)),
            1 => {
                if s.lo < self.bound {
                    let (lo, hi) = (s.lo + 1, s.hi.min(self.bound - 1) + 1);
                    match self.error {
                        Some(e) if lo <= e && e <= hi => {
                            successors.push(at(ERR, e, e));
                            if lo < e {
                                successors.push(at(1, lo, e - 1));
                            }
                            if e < hi {
                                successors.push(at(1, e + 1, hi));
                            }
                        }
                        _ => successors.push(at(1, lo, hi)),
                    }
                }
                if s.hi >= self.bound {
                    successors.push(at(2, s.lo.max(self.bound), s.hi));
                }
            }
            2 | ERR => {}
            loc => return Err(TransferError::new(format!("L{}", loc), "no such location").into()),
        }

        Ok(successors)
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    let program = Program {
        bound: args.bound,
        error: args.error,
    };
    let mut cpa = if args.join {
        Cpa::new(program, MergeJoin::new(Intervals), StopSep::new(Intervals))
    } else {
        Cpa::new(program, MergeSep, StopSep::new(Intervals))
    };
    if !args.all_errors {
        cpa = cpa.with_precision_adjustment(BreakOnTarget::new(StaticPrecisionAdjustment));
    }

    let shutdown = ShutdownNotifier::new();
    let mut algorithm = CpaAlgorithm::new(cpa, shutdown);

    let mut reached = ReachedSet::new(args.order);
    reached.add_initial(Interval { loc: 0, lo: 0, hi: 0 }, ());

    let outcome = algorithm.run(&mut reached)?;
    println!("outcome = {} ({})", outcome.termination, outcome.status);

    let mut states: Vec<_> = reached.states().collect();
    states.sort_by_key(|s| (s.loc, s.lo));
    for s in states {
        let marker = if s.is_target() { " <- error" } else { "" };
        println!("  L{}: x in [{}, {}]{}", s.loc, s.lo, s.hi, marker);
    }
    if outcome.is_break() {
        println!("{} states still waiting", reached.waitlist_size());
    }

    println!();
    let mut stats = Vec::new();
    algorithm.collect_statistics(&mut stats);
    for s in stats {
        println!("{}:\n{}", s.name(), s);
    }

    Ok(())
}
