use std::collections::{HashMap, HashSet, VecDeque};

use uuid::Uuid;

/// Requests waiting for the browser, in arrival order, and responses waiting to be picked up.
///
/// A request is handed to the page once; it stays queued until it is answered or abandoned.
#[derive(Debug)]
pub(crate) struct RequestQueue<Req, Resp> {
    requests: VecDeque<(Uuid, Req)>,
    /// Requests already handed to the page.
    dispatched: HashSet<Uuid>,
    responses: HashMap<Uuid, Resp>,
}

impl<Req, Resp> Default for RequestQueue<Req, Resp> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Resp> RequestQueue<Req, Resp> {
    pub fn new() -> Self {
        Self { requests: VecDeque::new(), dispatched: HashSet::new(), responses: HashMap::new() }
    }

    pub fn add_request(&mut self, id: Uuid, request: Req) {
        self.requests.push_back((id, request));
    }

    pub fn has_request(&self, id: &Uuid) -> bool {
        self.requests.iter().any(|(req_id, _)| req_id == id)
    }

    /// Oldest request not yet handed out, marking it as dispatched.
    pub fn next_request(&mut self) -> Option<&Req> {
        let (id, req) = self.requests.iter().find(|(id, _)| !self.dispatched.contains(id))?;
        self.dispatched.insert(*id);
        Some(req)
    }

    pub fn remove_request(&mut self, id: &Uuid) {
        self.requests.retain(|(req_id, _)| req_id != id);
        self.dispatched.remove(id);
    }

    /// Answers the queued request `id`. Returns `false` if it is not queued.
    pub fn add_response(&mut self, id: Uuid, response: Resp) -> bool {
        if !self.has_request(&id) {
            return false;
        }
        self.remove_request(&id);
        self.responses.insert(id, response);
        true
    }

    /// Takes the response for `id`, if one arrived.
    pub fn get_response(&mut self, id: &Uuid) -> Option<Resp> {
        self.responses.remove(id)
    }

    /// Forgets `id` entirely: the request, and a response that arrived too late.
    pub fn abandon(&mut self, id: &Uuid) {
        self.remove_request(id);
        self.responses.remove(id);
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty() && self.responses.is_empty()
    }
}
