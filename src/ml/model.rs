// ============================================================
// Layer 5 — DistilBERT Span Model
// ============================================================
// A post-norm transformer encoder with a two-logit span head,
// shaped so a pretrained DistilBERT question-answering
// checkpoint loads straight into it:
//
//   input_ids [batch, seq]
//     → word embedding + learned position embedding
//     → LayerNorm
//     → n_layers × { self-attention → add & norm
//                    lin1 → GELU → lin2 → add & norm }
//     → qa_outputs (dim → 2)
//     → start_logits, end_logits [batch, seq]
//
// Field names follow the checkpoint's parameter names
// (distilbert.embeddings.word_embeddings, …, qa_outputs) so only
// a handful of keys need remapping at load time (see
// infra::model_store).
//
// Reference: Sanh et al. (2019) DistilBERT
//            Devlin et al. (2019) BERT

use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

#[derive(Config, Debug)]
pub struct DistilBertQaConfig {
    pub vocab_size:              usize,
    pub max_position_embeddings: usize,
    /// Hidden size of every token vector
    pub dim:                     usize,
    pub n_layers:                usize,
    pub n_heads:                 usize,
    /// Inner size of the feed-forward network
    pub hidden_dim:              usize,
    #[config(default = 1e-12)]
    pub layer_norm_eps:          f64,
}

impl DistilBertQaConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DistilBertQa<B> {
        let embeddings = Embeddings {
            word_embeddings:     EmbeddingConfig::new(self.vocab_size, self.dim).init(device),
            position_embeddings: EmbeddingConfig::new(self.max_position_embeddings, self.dim).init(device),
            layer_norm:          self.layer_norm(device),
        };
        let layer = (0..self.n_layers)
            .map(|_| self.build_block(device))
            .collect();

        DistilBertQa {
            distilbert: DistilBert {
                embeddings,
                transformer: Transformer { layer },
            },
            qa_outputs: LinearConfig::new(self.dim, 2).init(device),
        }
    }

    fn layer_norm<B: Backend>(&self, device: &B::Device) -> LayerNorm<B> {
        LayerNormConfig::new(self.dim)
            .with_epsilon(self.layer_norm_eps)
            .init(device)
    }

    fn build_block<B: Backend>(&self, device: &B::Device) -> TransformerBlock<B> {
        TransformerBlock {
            attention: MultiHeadAttentionConfig::new(self.dim, self.n_heads)
                .with_dropout(0.0)
                .init(device),
            sa_layer_norm: self.layer_norm(device),
            ffn: FeedForward {
                lin1: LinearConfig::new(self.dim, self.hidden_dim).init(device),
                lin2: LinearConfig::new(self.hidden_dim, self.dim).init(device),
            },
            output_layer_norm: self.layer_norm(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct FeedForward<B: Backend> {
    pub lin1: Linear<B>,
    pub lin2: Linear<B>,
}

impl<B: Backend> FeedForward<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        self.lin2.forward(burn::tensor::activation::gelu(self.lin1.forward(x)))
    }
}

#[derive(Module, Debug)]
pub struct TransformerBlock<B: Backend> {
    pub attention:         MultiHeadAttention<B>,
    pub sa_layer_norm:     LayerNorm<B>,
    pub ffn:               FeedForward<B>,
    pub output_layer_norm: LayerNorm<B>,
}

impl<B: Backend> TransformerBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        let attn_output = self.attention.forward(MhaInput::self_attn(x.clone())).context;
        let x = self.sa_layer_norm.forward(x + attn_output);
        let ffn_output = self.ffn.forward(x.clone());
        self.output_layer_norm.forward(x + ffn_output)
    }
}

#[derive(Module, Debug)]
pub struct Transformer<B: Backend> {
    pub layer: Vec<TransformerBlock<B>>,
}

#[derive(Module, Debug)]
pub struct Embeddings<B: Backend> {
    pub word_embeddings:     Embedding<B>,
    pub position_embeddings: Embedding<B>,
    pub layer_norm:          LayerNorm<B>,
}

impl<B: Backend> Embeddings<B> {
    /// input_ids: [batch, seq_len] → [batch, seq_len, dim]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_len] = input_ids.dims();
        let device = input_ids.device();

        let words = self.word_embeddings.forward(input_ids);
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let positions = self.position_embeddings.forward(positions);

        self.layer_norm.forward(words + positions)
    }
}

#[derive(Module, Debug)]
pub struct DistilBert<B: Backend> {
    pub embeddings:  Embeddings<B>,
    pub transformer: Transformer<B>,
}

#[derive(Module, Debug)]
pub struct DistilBertQa<B: Backend> {
    pub distilbert: DistilBert<B>,
    pub qa_outputs: Linear<B>,
}

pub struct QaModelOutput<B: Backend> {
    pub start_logits: Tensor<B, 2>,
    pub end_logits:   Tensor<B, 2>,
}

impl<B: Backend> DistilBertQa<B> {
    /// input_ids: [batch, seq_len] → start_logits, end_logits: [batch, seq_len]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> QaModelOutput<B> {
        let [batch_size, seq_len] = input_ids.dims();

        let mut x = self.distilbert.embeddings.forward(input_ids);
        for block in &self.distilbert.transformer.layer {
            x = block.forward(x);
        }

        // Project to 2 logits per token then split into start / end.
        let logits = self.qa_outputs.forward(x); // [batch, seq_len, 2]
        let start_logits = logits.clone()
            .slice([0..batch_size, 0..seq_len, 0..1])
            .reshape([batch_size, seq_len]);
        let end_logits = logits
            .slice([0..batch_size, 0..seq_len, 1..2])
            .reshape([batch_size, seq_len]);

        QaModelOutput { start_logits, end_logits }
    }
}
