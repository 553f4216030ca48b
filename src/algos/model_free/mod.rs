//! Sample based methods: the agent only learns from episodes played on the
//! grid, never from its reward and action tables directly.

pub mod gradient_free;
