mod prequential_evaluator;

pub use prequential_evaluator::PrequentialEvaluator;
