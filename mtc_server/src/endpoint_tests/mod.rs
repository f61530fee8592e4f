mod alerts;
mod helpers;
mod mocks;
