mod binomial_convergence;
mod boundaries;
mod greeks_properties;
mod reference_fixtures;
mod solver_round_trip;
