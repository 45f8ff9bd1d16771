use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::card::Card;
use crate::state::RoundView;

use super::encoding::{ActionSpace, StateEncoder, STATE_FEATURES};

pub const DEFAULT_HIDDEN: usize = 128;
pub const DEFAULT_STACK: usize = 2;

/// Feed-forward policy head over the card action space. Training happens in
/// an external harness; the engine only carries the network for inference.
#[derive(Module, Debug)]
pub struct PolicyNetwork<B: Backend> {
    stack: Vec<Linear<B>>,
    output: Linear<B>,
}

impl<B> PolicyNetwork<B>
where
    B: Backend,
    B::Device: Default,
{
    pub fn new(hidden: usize, stack_depth: usize) -> Self {
        assert!(stack_depth > 0, "stack depth must be positive");
        let device = B::Device::default();
        let mut stack = Vec::with_capacity(stack_depth);
        let mut input_size = STATE_FEATURES;
        for _ in 0..stack_depth {
            stack.push(LinearConfig::new(input_size, hidden).init(&device));
            input_size = hidden;
        }
        let output = LinearConfig::new(input_size, ActionSpace::MAX).init(&device);
        Self { stack, output }
    }

    pub fn default() -> Self {
        Self::new(DEFAULT_HIDDEN, DEFAULT_STACK)
    }

    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut activations = input;
        for layer in &self.stack {
            activations = relu(layer.forward(activations));
        }
        self.output.forward(activations)
    }

    /// Logits for one view, masked to the legal card set.
    pub fn forward_view(&self, view: &RoundView, legal: &[Card]) -> Tensor<B, 1> {
        let batch = StateEncoder::encode_tensor::<B>(view, legal);
        let mask = ActionSpace::mask_tensor::<B>(legal);
        (self.forward(batch) + mask).reshape([ActionSpace::MAX])
    }
}
